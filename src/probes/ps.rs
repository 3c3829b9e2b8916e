//! Process-table aggregates: fork and run-queue figures from /proc/stat
//! plus the kernel's process/thread limits.

use std::path::PathBuf;

use super::Probe;
use crate::collect::{collect_key_value, collect_single, Separator};
use crate::registry::Registry;

pub struct PsProbe {
    proc_root: PathBuf,
}

impl PsProbe {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }
}

impl Probe for PsProbe {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn collect(&self, registry: &mut Registry) {
        // processes / procs_running / procs_blocked; the cpu time and
        // intr lines resolve outside the ps_ namespace and are ignored.
        collect_key_value(
            registry,
            self.proc_root.join("stat"),
            Separator::Whitespace,
            "ps_",
        );
        collect_single(
            registry,
            self.proc_root.join("sys/kernel/pid_max"),
            "ps_pid_max",
        );
        collect_single(
            registry,
            self.proc_root.join("sys/kernel/threads-max"),
            "ps_threads_max",
        );
    }
}
