//! Network interface counters from sysfs statistics files.
//!
//! Each counter lives in its own single-scalar file under
//! `/sys/class/net/<dev>/statistics/`; the file's base name doubles as
//! the metric suffix.

use std::path::PathBuf;

use super::Probe;
use crate::collect::collect_single;
use crate::registry::Registry;

const INTERFACE_COUNTERS: &[&str] = &[
    "rx_bytes",
    "rx_dropped",
    "rx_errors",
    "rx_packets",
    "tx_bytes",
    "tx_dropped",
    "tx_errors",
    "tx_packets",
];

pub struct NetProbe {
    statistics_dir: PathBuf,
}

impl NetProbe {
    pub fn new(sys_root: impl Into<PathBuf>, device: &str) -> Self {
        Self {
            statistics_dir: sys_root
                .into()
                .join("class/net")
                .join(device)
                .join("statistics"),
        }
    }
}

impl Probe for NetProbe {
    fn name(&self) -> &'static str {
        "net"
    }

    fn collect(&self, registry: &mut Registry) {
        for counter in INTERFACE_COUNTERS {
            let metric = format!("net_{counter}");
            collect_single(registry, self.statistics_dir.join(counter), &metric);
        }
    }
}
