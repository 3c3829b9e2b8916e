//! Run-time metric registry.
//!
//! The registry binds each schema descriptor to one mutable value slot,
//! in the same sorted order as the table, so lookups are a binary search
//! over the descriptor names. Collectors write slots during a polling
//! cycle; `begin_cycle` is the only place where state crosses a cycle
//! boundary.
//!
//! A registry is an explicit value passed by reference into every
//! collector and probe call; nothing here is global, so tests (or an
//! embedding process) can run any number of independent registries.

use serde::Serialize;

use crate::schema::{MetricDescriptor, MetricKind, SchemaTable};

/// A typed metric value. Serializes untagged: counters and gauges as
/// numbers, text as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Counter(u64),
    Gauge(f64),
    Text(String),
}

impl Value {
    fn zero_for(kind: MetricKind) -> Value {
        match kind {
            MetricKind::Counter => Value::Counter(0),
            MetricKind::Gauge => Value::Gauge(0.0),
            MetricKind::Text => Value::Text(String::new()),
        }
    }
}

/// A raw value as parsed from a system file, before unit scaling.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(u64),
    Float(f64),
    Text(String),
}

/// Opaque handle to one slot, returned by `Registry::lookup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId(usize);

/// Mutable per-metric state, one per descriptor.
#[derive(Debug, Clone)]
struct MetricSlot {
    current: Value,
    /// Only meaningful when `prev_present` is true.
    previous: Value,
    /// Was this slot written during the current cycle?
    present: bool,
    /// Was this slot written during the immediately preceding cycle?
    prev_present: bool,
    /// Did the last conversion clamp at the type maximum?
    saturated: bool,
    last_updated_cycle: u64,
}

impl MetricSlot {
    fn new(kind: MetricKind) -> Self {
        Self {
            current: Value::zero_for(kind),
            previous: Value::zero_for(kind),
            present: false,
            prev_present: false,
            saturated: false,
            last_updated_cycle: 0,
        }
    }
}

/// One metric's state as seen through a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading<'a> {
    pub name: &'static str,
    pub kind: MetricKind,
    /// `None` when the metric was not collected in the last cycle.
    pub value: Option<&'a Value>,
    pub saturated: bool,
}

/// Sorted slot array plus the poll-cycle counter.
#[derive(Debug, Clone)]
pub struct Registry {
    table: SchemaTable,
    slots: Vec<MetricSlot>,
    cycle: u64,
}

impl Registry {
    /// Builds one slot per descriptor; all slots start absent.
    pub fn new(table: SchemaTable) -> Self {
        let slots = table
            .descriptors()
            .iter()
            .map(|d| MetricSlot::new(d.kind))
            .collect();
        Self {
            table,
            slots,
            cycle: 0,
        }
    }

    /// A registry over the compiled-in schema table.
    pub fn builtin() -> Self {
        Self::new(SchemaTable::builtin().clone())
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Opens the next polling cycle. For every slot the current value is
    /// rolled into `previous` (only if the slot was actually collected),
    /// and the presence flag is cleared so staleness stays observable.
    pub fn begin_cycle(&mut self) {
        self.cycle += 1;
        for slot in &mut self.slots {
            if slot.present {
                slot.previous = slot.current.clone();
                slot.prev_present = true;
            } else {
                slot.prev_present = false;
            }
            slot.present = false;
            slot.saturated = false;
        }
    }

    /// Binary search by name. A miss is the normal outcome for any label
    /// a collector reads that is outside the tracked namespace.
    pub fn lookup(&self, name: &str) -> Option<SlotId> {
        self.table
            .descriptors()
            .binary_search_by(|d| d.name.cmp(name))
            .ok()
            .map(SlotId)
    }

    pub fn descriptor(&self, id: SlotId) -> &MetricDescriptor {
        &self.table.descriptors()[id.0]
    }

    /// Applies the descriptor's unit multiplier and stores the value,
    /// marking the slot present for this cycle. A conversion that would
    /// overflow clamps at the type maximum and flags the slot saturated
    /// rather than wrapping silently.
    pub fn set_value(&mut self, id: SlotId, raw: RawValue) {
        let desc = self.table.descriptors()[id.0];
        let multiplier = desc.unit.multiplier();
        let slot = &mut self.slots[id.0];

        let (value, saturated) = match (desc.kind, raw) {
            (MetricKind::Counter, RawValue::Int(v)) => match v.checked_mul(multiplier) {
                Some(scaled) => (Value::Counter(scaled), false),
                None => (Value::Counter(u64::MAX), true),
            },
            (MetricKind::Gauge, RawValue::Float(v)) => {
                let scaled = v * multiplier as f64;
                if scaled.is_finite() {
                    (Value::Gauge(scaled), false)
                } else {
                    (Value::Gauge(f64::MAX), true)
                }
            }
            (MetricKind::Gauge, RawValue::Int(v)) => {
                let scaled = v as f64 * multiplier as f64;
                if scaled.is_finite() {
                    (Value::Gauge(scaled), false)
                } else {
                    (Value::Gauge(f64::MAX), true)
                }
            }
            (MetricKind::Text, RawValue::Text(v)) => (Value::Text(v), false),
            (kind, raw) => {
                // Collectors parse according to the declared kind, so a
                // mismatch here is a programming error in the caller.
                tracing::trace!(
                    metric = desc.name,
                    ?kind,
                    ?raw,
                    "value type does not match descriptor kind, ignoring"
                );
                return;
            }
        };

        slot.current = value;
        slot.saturated = saturated;
        slot.present = true;
        slot.last_updated_cycle = self.cycle;
    }

    /// Change in a COUNTER metric between the two most recent cycles.
    ///
    /// Returns `None` unless the slot was collected in both the current
    /// and the immediately preceding cycle; a metric that disappeared
    /// for a cycle reports unavailable rather than a number spanning the
    /// gap. A single counter wrap is tolerated: the delta is taken
    /// modulo the u64 value space.
    pub fn delta(&self, id: SlotId) -> Option<u64> {
        let desc = &self.table.descriptors()[id.0];
        if desc.kind != MetricKind::Counter {
            return None;
        }
        let slot = &self.slots[id.0];
        if !slot.present || !slot.prev_present {
            return None;
        }
        match (&slot.current, &slot.previous) {
            (Value::Counter(cur), Value::Counter(prev)) => Some(cur.wrapping_sub(*prev)),
            _ => None,
        }
    }

    /// One metric's state as of the last completed cycle.
    pub fn reading(&self, id: SlotId) -> MetricReading<'_> {
        let desc = &self.table.descriptors()[id.0];
        let slot = &self.slots[id.0];
        MetricReading {
            name: desc.name,
            kind: desc.kind,
            value: slot.present.then_some(&slot.current),
            saturated: slot.saturated,
        }
    }

    /// Lazy walk over every slot in namespace order, reflecting the
    /// state as of the last completed `begin_cycle`. Restartable: each
    /// call produces a fresh iterator.
    pub fn snapshot(&self) -> impl Iterator<Item = MetricReading<'_>> + '_ {
        self.table
            .descriptors()
            .iter()
            .zip(self.slots.iter())
            .map(|(desc, slot)| MetricReading {
                name: desc.name,
                kind: desc.kind,
                value: slot.present.then_some(&slot.current),
                saturated: slot.saturated,
            })
    }
}
