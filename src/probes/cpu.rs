//! Aggregate CPU/interrupt counters from /proc/stat.
//!
//! The per-cpu time lines ("cpu0 ...") resolve to labels outside the
//! tracked namespace and are ignored by the key-value collector; the
//! scalar lines (ctxt, btime, ...) and the leading totals of the intr
//! and softirq lines are what this probe tracks.

use std::path::PathBuf;

use super::Probe;
use crate::collect::{collect_key_value, Separator};
use crate::registry::Registry;

pub struct CpuProbe {
    stat_path: PathBuf,
}

impl CpuProbe {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: proc_root.into().join("stat"),
        }
    }
}

impl Probe for CpuProbe {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn collect(&self, registry: &mut Registry) {
        collect_key_value(registry, &self.stat_path, Separator::Whitespace, "cpu_");
    }
}
