//! Subsystem probes.
//!
//! Each probe is a thin, fixed mapping from the system files its domain
//! exposes to metric names, driven entirely through the two generic
//! collectors in `crate::collect`. Probes carry their source roots and
//! device identifiers as plain data, so tests point them at synthetic
//! trees instead of the live /proc and /sys.

pub mod cpu;
pub mod ib;
pub mod job;
pub mod lustre;
pub mod mem;
pub mod net;
pub mod ps;
pub mod vm;

pub use cpu::CpuProbe;
pub use ib::IbProbe;
pub use job::JobProbe;
pub use lustre::LustreProbe;
pub use mem::MemProbe;
pub use net::NetProbe;
pub use ps::PsProbe;
pub use vm::VmProbe;

use crate::registry::Registry;

/// One subsystem's collection step within a polling cycle.
///
/// `collect` runs to completion and never fails the cycle: unavailable
/// sources leave their slots absent and are logged at debug level by
/// the underlying collectors.
pub trait Probe: Send {
    fn name(&self) -> &'static str;
    fn collect(&self, registry: &mut Registry);
}
