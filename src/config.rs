//! Configuration management for nodestats-collector.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_SYS_ROOT: &str = "/sys";
pub const DEFAULT_NET_DEVICE: &str = "eth0";
pub const DEFAULT_IB_DEVICE: &str = "mlx5_0";
pub const DEFAULT_IB_PORT: u32 = 1;

/// Default config search locations, in precedence order. Every format
/// the loader understands must appear for both locations, so a file
/// generated by the `config` subcommand is picked up wherever it lands.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "/etc/nodestats/collector.yaml",
    "/etc/nodestats/collector.yml",
    "/etc/nodestats/collector.json",
    "/etc/nodestats/collector.toml",
    "./nodestats-collector.yaml",
    "./nodestats-collector.yml",
    "./nodestats-collector.json",
    "./nodestats-collector.toml",
];

/// Collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Polling
    #[serde(alias = "interval-seconds")]
    pub interval_seconds: Option<u64>,

    /// Snapshot sink; stdout when unset
    pub output: Option<PathBuf>,

    // Source roots (overridable so tests and containers can relocate them)
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "sys-root")]
    pub sys_root: Option<PathBuf>,

    // Domain-specific source selection
    #[serde(alias = "net-device")]
    pub net_device: Option<String>,
    #[serde(alias = "ib-device")]
    pub ib_device: Option<String>,
    #[serde(alias = "ib-port")]
    pub ib_port: Option<u32>,
    /// Lustre llite target directory name (probe skipped when unset)
    #[serde(alias = "lustre-target")]
    pub lustre_target: Option<String>,
    #[serde(alias = "jobid-file")]
    pub jobid_file: Option<PathBuf>,

    // Probe enable flags
    #[serde(alias = "enable-cpu")]
    pub enable_cpu: Option<bool>,
    #[serde(alias = "enable-ib")]
    pub enable_ib: Option<bool>,
    #[serde(alias = "enable-job")]
    pub enable_job: Option<bool>,
    #[serde(alias = "enable-lustre")]
    pub enable_lustre: Option<bool>,
    #[serde(alias = "enable-mem")]
    pub enable_mem: Option<bool>,
    #[serde(alias = "enable-net")]
    pub enable_net: Option<bool>,
    #[serde(alias = "enable-ps")]
    pub enable_ps: Option<bool>,
    #[serde(alias = "enable-vm")]
    pub enable_vm: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_seconds: Some(DEFAULT_INTERVAL_SECS),
            output: None,
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            sys_root: Some(PathBuf::from(DEFAULT_SYS_ROOT)),
            net_device: Some(DEFAULT_NET_DEVICE.to_string()),
            ib_device: Some(DEFAULT_IB_DEVICE.to_string()),
            ib_port: Some(DEFAULT_IB_PORT),
            lustre_target: None,
            jobid_file: Some(PathBuf::from(
                nodestats_collector::probes::job::DEFAULT_JOBID_FILE,
            )),
            enable_cpu: Some(true),
            enable_ib: Some(true),
            enable_job: Some(true),
            enable_lustre: Some(true),
            enable_mem: Some(true),
            enable_net: Some(true),
            enable_ps: Some(true),
            enable_vm: Some(true),
            log_level: Some("info".into()),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECS) == 0 {
        return Err("interval_seconds must be at least 1".into());
    }

    if cfg.ib_port.unwrap_or(DEFAULT_IB_PORT) == 0 {
        return Err("ib_port must be at least 1 (sysfs ports are 1-based)".into());
    }

    // Probe flags: at least one must be true
    let any_enabled = [
        cfg.enable_cpu,
        cfg.enable_ib,
        cfg.enable_job,
        cfg.enable_lustre,
        cfg.enable_mem,
        cfg.enable_net,
        cfg.enable_ps,
        cfg.enable_vm,
    ]
    .iter()
    .any(|flag| flag.unwrap_or(true));

    if !any_enabled {
        return Err("at least one probe must be enabled".into());
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    // Override with CLI args
    if let Some(interval) = args.interval {
        config.interval_seconds = Some(interval);
    }

    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        DEFAULT_CONFIG_PATHS
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}
