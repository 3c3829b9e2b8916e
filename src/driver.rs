//! Drives one polling cycle at a time.
//!
//! Probe construction follows the effective config (enable flags plus
//! source roots/devices); the cycle itself runs every probe to
//! completion under a single registry write lock, so no two collector
//! calls ever write concurrently and a snapshot reader observes either
//! the fully-prior or the fully-current cycle, never a torn mix.

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{debug, info};

use nodestats_collector::probes::{
    CpuProbe, IbProbe, JobProbe, LustreProbe, MemProbe, NetProbe, Probe, PsProbe, VmProbe,
};
use nodestats_collector::registry::Registry;

use crate::config::{
    Config, DEFAULT_IB_DEVICE, DEFAULT_IB_PORT, DEFAULT_NET_DEVICE, DEFAULT_PROC_ROOT,
    DEFAULT_SYS_ROOT,
};

/// Builds the enabled probes from the effective configuration.
pub fn build_probes(config: &Config) -> Vec<Box<dyn Probe>> {
    let proc_root: PathBuf = config
        .proc_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT));
    let sys_root: PathBuf = config
        .sys_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SYS_ROOT));

    let mut probes: Vec<Box<dyn Probe>> = Vec::new();

    if config.enable_cpu.unwrap_or(true) {
        probes.push(Box::new(CpuProbe::new(&proc_root)));
    }
    if config.enable_ib.unwrap_or(true) {
        let device = config.ib_device.as_deref().unwrap_or(DEFAULT_IB_DEVICE);
        let port = config.ib_port.unwrap_or(DEFAULT_IB_PORT);
        probes.push(Box::new(IbProbe::new(&sys_root, device, port)));
    }
    if config.enable_job.unwrap_or(true) {
        let jobid_file = config.jobid_file.clone().unwrap_or_else(|| {
            PathBuf::from(nodestats_collector::probes::job::DEFAULT_JOBID_FILE)
        });
        probes.push(Box::new(JobProbe::new(jobid_file)));
    }
    if config.enable_lustre.unwrap_or(true) {
        match config.lustre_target.as_deref() {
            Some(target) => probes.push(Box::new(LustreProbe::new(&proc_root, target))),
            None => info!("lustre probe enabled but no lustre_target configured, skipping"),
        }
    }
    if config.enable_mem.unwrap_or(true) {
        probes.push(Box::new(MemProbe::new(&proc_root)));
    }
    if config.enable_net.unwrap_or(true) {
        let device = config.net_device.as_deref().unwrap_or(DEFAULT_NET_DEVICE);
        probes.push(Box::new(NetProbe::new(&sys_root, device)));
    }
    if config.enable_ps.unwrap_or(true) {
        probes.push(Box::new(PsProbe::new(&proc_root)));
    }
    if config.enable_vm.unwrap_or(true) {
        probes.push(Box::new(VmProbe::new(&proc_root)));
    }

    probes
}

/// Runs one full polling cycle: open the cycle, then every probe in
/// order. The write lock spans `begin_cycle` and all collector writes.
pub fn run_cycle(registry: &RwLock<Registry>, probes: &[Box<dyn Probe>]) {
    let mut registry = registry.write().expect("registry lock poisoned");
    registry.begin_cycle();
    let cycle = registry.cycle();
    for probe in probes {
        probe.collect(&mut registry);
        debug!(probe = probe.name(), cycle, "probe completed");
    }
}
