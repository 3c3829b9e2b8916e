//! Metric schema table.
//!
//! The metric namespace is authored in `schema/metrics.list` and compiled
//! into the binary by `build.rs`, which rejects any list that is not
//! strictly sorted. `SchemaTable::new` re-runs the same validation for
//! tables built at run time (primarily tests), so the binary-search
//! invariant holds for every table in the process, however it was made.

use once_cell::sync::Lazy;
use thiserror::Error;

/// What a metric's value means across polling cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonically increasing counter; supports delta/rate derivation.
    Counter,
    /// Point-in-time numeric reading.
    Gauge,
    /// Short textual value (e.g. a batch job id).
    Text,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Text => "string",
        }
    }
}

/// Raw-to-reported conversion applied when a value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    None,
    /// Kibibytes, as in /proc/meminfo.
    KiB,
    MiB,
    /// 4-byte words, used by InfiniBand port data counters.
    Word4,
}

impl Unit {
    pub fn multiplier(&self) -> u64 {
        match self {
            Unit::None => 1,
            Unit::KiB => 1024,
            Unit::MiB => 1024 * 1024,
            Unit::Word4 => 4,
        }
    }
}

/// One immutable schema entry: the sort key is `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub kind: MetricKind,
    pub unit: Unit,
}

include!(concat!(env!("OUT_DIR"), "/schema_table.rs"));

/// Validation failures for an authored descriptor list.
///
/// For the compiled-in table these are impossible by construction
/// (build.rs already rejected them); they can only surface for tables
/// assembled at run time.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("descriptor #{index} ({name:?}) is out of order or duplicates its predecessor")]
    OutOfOrder { index: usize, name: String },

    #[error("descriptor #{index} has invalid name {name:?}")]
    InvalidName { index: usize, name: String },
}

/// An ordered, immutable sequence of metric descriptors.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    descriptors: Vec<MetricDescriptor>,
}

impl SchemaTable {
    /// Builds a table from an authored descriptor list, validating that
    /// names are legal and strictly ascending.
    pub fn new(descriptors: Vec<MetricDescriptor>) -> Result<Self, SchemaError> {
        for (index, desc) in descriptors.iter().enumerate() {
            if !valid_name(desc.name) {
                return Err(SchemaError::InvalidName {
                    index,
                    name: desc.name.to_string(),
                });
            }
            if index > 0 && desc.name <= descriptors[index - 1].name {
                return Err(SchemaError::OutOfOrder {
                    index,
                    name: desc.name.to_string(),
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// The table compiled in from `schema/metrics.list`.
    pub fn builtin() -> &'static SchemaTable {
        static BUILTIN: Lazy<SchemaTable> = Lazy::new(|| {
            SchemaTable::new(BUILTIN_DESCRIPTORS.to_vec())
                .expect("compiled-in schema table failed validation")
        });
        &BUILTIN
    }

    pub fn descriptors(&self) -> &[MetricDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &'static str) -> MetricDescriptor {
        MetricDescriptor {
            name,
            kind: MetricKind::Gauge,
            unit: Unit::None,
        }
    }

    #[test]
    fn test_sorted_list_accepted() {
        let table = SchemaTable::new(vec![desc("aaa"), desc("bbb"), desc("ccc")]).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_unsorted_list_rejected() {
        let err = SchemaTable::new(vec![desc("bbb"), desc("aaa")]).unwrap_err();
        assert!(matches!(err, SchemaError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = SchemaTable::new(vec![desc("aaa"), desc("aaa")]).unwrap_err();
        assert!(matches!(err, SchemaError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let err = SchemaTable::new(vec![desc("9lives")]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidName { index: 0, .. }));
    }

    #[test]
    fn test_builtin_table_is_strictly_sorted() {
        let table = SchemaTable::builtin();
        assert!(!table.is_empty());
        for pair in table.descriptors().windows(2) {
            assert!(
                pair[0].name < pair[1].name,
                "{} must sort before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn test_unit_multipliers() {
        assert_eq!(Unit::None.multiplier(), 1);
        assert_eq!(Unit::KiB.multiplier(), 1024);
        assert_eq!(Unit::MiB.multiplier(), 1024 * 1024);
        assert_eq!(Unit::Word4.multiplier(), 4);
    }
}
