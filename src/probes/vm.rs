//! Virtual-memory paging and fault counters from /proc/vmstat.

use std::path::PathBuf;

use super::Probe;
use crate::collect::{collect_key_value, Separator};
use crate::registry::Registry;

pub struct VmProbe {
    vmstat_path: PathBuf,
}

impl VmProbe {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            vmstat_path: proc_root.into().join("vmstat"),
        }
    }
}

impl Probe for VmProbe {
    fn name(&self) -> &'static str {
        "vm"
    }

    fn collect(&self, registry: &mut Registry) {
        collect_key_value(registry, &self.vmstat_path, Separator::Whitespace, "vm_");
    }
}
