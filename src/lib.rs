//! nodestats-collector library
//!
//! Node-level resource-statistics collection for cluster/HPC hosts: a
//! validated, sorted metric namespace (schema table), a run-time
//! registry binding descriptors to value slots, two generic file
//! collectors, and the eight subsystem probes built on top of them.
//!
//! # Usage
//!
//! ```rust
//! use nodestats_collector::collect::{collect_key_value, Separator};
//! use nodestats_collector::registry::Registry;
//!
//! // One registry per collecting process; tests can build their own
//! // schema tables and run any number of independent registries.
//! let mut registry = Registry::builtin();
//!
//! // Each polling cycle: open the cycle, run the probes, then read
//! // the snapshot.
//! registry.begin_cycle();
//! collect_key_value(&mut registry, "/proc/meminfo", Separator::Colon, "mem_");
//! for reading in registry.snapshot() {
//!     println!("{} = {:?}", reading.name, reading.value);
//! }
//! ```

pub mod collect;
pub mod probes;
pub mod registry;
pub mod report;
pub mod schema;

// Re-export main types for convenience
pub use collect::{
    collect_key_value, collect_key_value_mapped, collect_single, Outcome, Separator,
};
pub use registry::{MetricReading, RawValue, Registry, SlotId, Value};
pub use report::Reporter;
pub use schema::{MetricDescriptor, MetricKind, SchemaError, SchemaTable, Unit};
