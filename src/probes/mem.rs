//! Memory fields from /proc/meminfo.
//!
//! meminfo values carry a trailing "kB" suffix; the collector's
//! first-token parse drops it and the schema's `kb` unit scales the
//! stored gauges to bytes.

use std::path::PathBuf;

use super::Probe;
use crate::collect::{collect_key_value, Separator};
use crate::registry::Registry;

pub struct MemProbe {
    meminfo_path: PathBuf,
}

impl MemProbe {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            meminfo_path: proc_root.into().join("meminfo"),
        }
    }
}

impl Probe for MemProbe {
    fn name(&self) -> &'static str {
        "mem"
    }

    fn collect(&self, registry: &mut Registry) {
        collect_key_value(registry, &self.meminfo_path, Separator::Colon, "mem_");
    }
}
