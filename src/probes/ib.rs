//! InfiniBand port counters from sysfs.
//!
//! The legacy port data counters count 4-byte words; the schema's `w4`
//! unit converts them to bytes when stored. These counters are also
//! only 32 bits wide on older HCAs, which is exactly the wraparound
//! case the registry's delta helper tolerates.

use std::path::PathBuf;

use super::Probe;
use crate::collect::collect_single;
use crate::registry::Registry;

const PORT_COUNTERS: &[(&str, &str)] = &[
    ("port_rcv_data", "ib_port_rcv_data"),
    ("port_rcv_packets", "ib_port_rcv_packets"),
    ("port_xmit_data", "ib_port_xmit_data"),
    ("port_xmit_packets", "ib_port_xmit_packets"),
];

pub struct IbProbe {
    counters_dir: PathBuf,
}

impl IbProbe {
    pub fn new(sys_root: impl Into<PathBuf>, device: &str, port: u32) -> Self {
        Self {
            counters_dir: sys_root
                .into()
                .join("class/infiniband")
                .join(device)
                .join("ports")
                .join(port.to_string())
                .join("counters"),
        }
    }
}

impl Probe for IbProbe {
    fn name(&self) -> &'static str {
        "ib"
    }

    fn collect(&self, registry: &mut Registry) {
        for (file, metric) in PORT_COUNTERS {
            collect_single(registry, self.counters_dir.join(file), metric);
        }
    }
}
