//! Lustre client (llite) statistics.
//!
//! The `stats` file is whitespace key-value: each row's first column
//! after the label is the event count, so the `read_bytes` and
//! `write_bytes` rows store operation counts and are tracked under
//! `lustre_read_ops`/`lustre_write_ops` rather than a byte-sounding
//! name. Capacity figures come from the llite single-value files and
//! stay in the kilobyte/inode units the filesystem reports.

use std::path::PathBuf;

use super::Probe;
use crate::collect::{collect_key_value_mapped, collect_single, Separator};
use crate::registry::Registry;

// Rows whose kernel label would mislead as a metric suffix.
const STATS_ALIASES: &[(&str, &str)] = &[
    ("read_bytes", "lustre_read_ops"),
    ("write_bytes", "lustre_write_ops"),
];

const CAPACITY_FILES: &[(&str, &str)] = &[
    ("filesfree", "lustre_filesfree"),
    ("filestotal", "lustre_filestotal"),
    ("kbytesavail", "lustre_kbytesavail"),
    ("kbytesfree", "lustre_kbytesfree"),
    ("kbytestotal", "lustre_kbytestotal"),
];

pub struct LustreProbe {
    llite_dir: PathBuf,
}

impl LustreProbe {
    /// `target` is the llite directory name, e.g. `scratch-ffff8802`.
    pub fn new(proc_root: impl Into<PathBuf>, target: &str) -> Self {
        Self {
            llite_dir: proc_root.into().join("fs/lustre/llite").join(target),
        }
    }
}

impl Probe for LustreProbe {
    fn name(&self) -> &'static str {
        "lustre"
    }

    fn collect(&self, registry: &mut Registry) {
        collect_key_value_mapped(
            registry,
            self.llite_dir.join("stats"),
            Separator::Whitespace,
            "lustre_",
            STATS_ALIASES,
        );
        for (file, metric) in CAPACITY_FILES {
            collect_single(registry, self.llite_dir.join(file), metric);
        }
    }
}
