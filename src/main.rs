//! nodestats-collector - version 0.1.0
//!
//! Node-level resource statistics collector with tracing logging.
//! This is the main entry point that drives the poll loop and handles subcommands.

mod cli;
mod commands;
mod config;
mod driver;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use clap::Parser;
use tokio::{signal, time};
use tracing::{error, info, Level};

use nodestats_collector::registry::Registry;
use nodestats_collector::report::Reporter;
use nodestats_collector::schema::SchemaTable;

use cli::{Args, Commands, LogLevel};
use commands::{command_config, command_test};
use config::{resolve_config, show_config, validate_effective_config, Config, DEFAULT_INTERVAL_SECS};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", args.log_level);
}

/// Opens the snapshot sink: a file in append mode, or stdout.
fn open_output(config: &Config) -> Result<Box<dyn Write + Send>, Box<dyn std::error::Error>> {
    match &config.output {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            info!("Publishing snapshots to {}", path.display());
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        if let Commands::Config { output, format } = command {
            return command_config(output.clone(), *format);
        }

        let config = resolve_config(&args)?;
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
        setup_logging(&args);

        return match command {
            Commands::Test { iterations, format } => {
                command_test(*iterations, *format, &config).await
            }
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    // Load configuration for collector mode
    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&args);

    info!(
        "Starting nodestats-collector (built {})",
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    );

    let interval_secs = config.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECS);
    let interval = Duration::from_secs(interval_secs);

    let table = SchemaTable::builtin();
    info!(
        metrics = table.len(),
        interval_secs, "Metric registry initialized"
    );

    let registry = Arc::new(RwLock::new(Registry::new(table.clone())));
    let probes = driver::build_probes(&config);
    info!(probes = probes.len(), "Probes configured");

    let mut reporter = Reporter::new(open_output(&config)?, interval);

    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };
    tokio::pin!(shutdown_signal);

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                driver::run_cycle(&registry, &probes);

                // Cycle complete: publish under a read lock so a future
                // concurrent reader could never observe a torn snapshot.
                let registry = registry.read().expect("registry lock poisoned");
                if let Err(e) = reporter.publish(&registry) {
                    error!("Failed to publish snapshot: {}", e);
                }
            }
            _ = &mut shutdown_signal => {
                break;
            }
        }
    }

    info!("nodestats-collector stopped gracefully");
    Ok(())
}
