//! Integration tests for the generic collectors.
//!
//! These exercise the key-value and single-value collectors against
//! real files in temporary directories, covering the partial-failure,
//! duplicate-label and missing-source contracts.

use std::fs;

use tempfile::TempDir;

use nodestats_collector::collect::{
    collect_key_value, collect_key_value_mapped, collect_single, Outcome, Separator,
};
use nodestats_collector::registry::{Registry, Value};
use nodestats_collector::schema::{MetricDescriptor, MetricKind, SchemaTable, Unit};

fn test_registry() -> Registry {
    let table = SchemaTable::new(vec![
        MetricDescriptor {
            name: "cpu_user",
            kind: MetricKind::Counter,
            unit: Unit::None,
        },
        MetricDescriptor {
            name: "mem_free",
            kind: MetricKind::Gauge,
            unit: Unit::None,
        },
        MetricDescriptor {
            name: "node_id",
            kind: MetricKind::Text,
            unit: Unit::None,
        },
    ])
    .unwrap();
    let mut registry = Registry::new(table);
    registry.begin_cycle();
    registry
}

fn value(registry: &Registry, name: &str) -> Option<Value> {
    let id = registry.lookup(name).unwrap();
    registry.reading(id).value.cloned()
}

#[test]
fn test_key_value_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");
    fs::write(&path, "cpu_user: 1200\nmem_free: 4096\nextra_field: x\n").unwrap();

    let mut registry = test_registry();
    let outcome = collect_key_value(&mut registry, &path, Separator::Colon, "");

    assert_eq!(
        outcome,
        Outcome::Collected {
            updated: 2,
            skipped: 0
        }
    );
    assert_eq!(value(&registry, "cpu_user"), Some(Value::Counter(1200)));
    assert_eq!(value(&registry, "mem_free"), Some(Value::Gauge(4096.0)));
    // node_id was never collected: unavailable, not zero.
    assert_eq!(value(&registry, "node_id"), None);
}

#[test]
fn test_aliased_label_resolves_past_prefix() {
    // A file label that would mislead as a metric suffix can be routed
    // to a differently named metric; unaliased labels still resolve by
    // prefix.
    let table = SchemaTable::new(vec![
        MetricDescriptor {
            name: "fs_open",
            kind: MetricKind::Counter,
            unit: Unit::None,
        },
        MetricDescriptor {
            name: "fs_read_ops",
            kind: MetricKind::Counter,
            unit: Unit::None,
        },
    ])
    .unwrap();
    let mut registry = Registry::new(table);
    registry.begin_cycle();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");
    fs::write(
        &path,
        "read_bytes 4096 samples [bytes] 0 1048576\nopen 55 samples [regs]\n",
    )
    .unwrap();

    let outcome = collect_key_value_mapped(
        &mut registry,
        &path,
        Separator::Whitespace,
        "fs_",
        &[("read_bytes", "fs_read_ops")],
    );

    assert_eq!(
        outcome,
        Outcome::Collected {
            updated: 2,
            skipped: 0
        }
    );
    assert_eq!(value(&registry, "fs_read_ops"), Some(Value::Counter(4096)));
    assert_eq!(value(&registry, "fs_open"), Some(Value::Counter(55)));
    assert_eq!(registry.lookup("fs_read_bytes"), None);
}

#[test]
fn test_malformed_line_does_not_abandon_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");

    // Ten known labels, one of them with an unparseable value.
    let mut table = Vec::new();
    for i in 0..10 {
        table.push(MetricDescriptor {
            name: Box::leak(format!("m{i}").into_boxed_str()),
            kind: MetricKind::Counter,
            unit: Unit::None,
        });
    }
    let mut registry = Registry::new(SchemaTable::new(table).unwrap());
    registry.begin_cycle();

    let mut content = String::new();
    for i in 0..10 {
        if i == 4 {
            content.push_str("m4 definitely-not-a-number\n");
        } else {
            content.push_str(&format!("m{i} {}\n", i * 100));
        }
    }
    fs::write(&path, content).unwrap();

    let outcome = collect_key_value(&mut registry, &path, Separator::Whitespace, "");
    assert_eq!(
        outcome,
        Outcome::Collected {
            updated: 9,
            skipped: 1
        }
    );
    assert_eq!(value(&registry, "m4"), None);
    assert_eq!(value(&registry, "m9"), Some(Value::Counter(900)));
}

#[test]
fn test_duplicate_label_last_occurrence_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");
    fs::write(&path, "cpu_user: 100\ncpu_user: 250\n").unwrap();

    let mut registry = test_registry();
    collect_key_value(&mut registry, &path, Separator::Colon, "");
    assert_eq!(value(&registry, "cpu_user"), Some(Value::Counter(250)));
}

#[test]
fn test_key_value_idempotent_within_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");
    fs::write(&path, "cpu_user: 1200\nmem_free: 4096\n").unwrap();

    let mut registry = test_registry();
    collect_key_value(&mut registry, &path, Separator::Colon, "");
    let first: Vec<_> = registry.snapshot().map(|r| r.value.cloned()).collect();

    collect_key_value(&mut registry, &path, Separator::Colon, "");
    let second: Vec<_> = registry.snapshot().map(|r| r.value.cloned()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_missing_source_leaves_slots_absent() {
    let dir = TempDir::new().unwrap();
    let mut registry = test_registry();

    let outcome = collect_key_value(
        &mut registry,
        dir.path().join("does-not-exist"),
        Separator::Colon,
        "",
    );
    assert_eq!(outcome, Outcome::SourceUnavailable);
    assert!(registry.snapshot().all(|r| r.value.is_none()));
}

#[test]
fn test_prefix_resolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");
    fs::write(&path, "user: 42\n").unwrap();

    let mut registry = test_registry();
    collect_key_value(&mut registry, &path, Separator::Colon, "cpu_");
    assert_eq!(value(&registry, "cpu_user"), Some(Value::Counter(42)));
}

#[test]
fn test_meminfo_style_unit_suffix_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meminfo");
    fs::write(&path, "mem_free:       4096 kB\n").unwrap();

    let mut registry = test_registry();
    let outcome = collect_key_value(&mut registry, &path, Separator::Colon, "");
    assert_eq!(
        outcome,
        Outcome::Collected {
            updated: 1,
            skipped: 0
        }
    );
    assert_eq!(value(&registry, "mem_free"), Some(Value::Gauge(4096.0)));
}

#[test]
fn test_non_matching_lines_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats");
    fs::write(&path, "no separator on this line\n\ncpu_user: 7\n").unwrap();

    let mut registry = test_registry();
    let outcome = collect_key_value(&mut registry, &path, Separator::Colon, "");
    assert_eq!(
        outcome,
        Outcome::Collected {
            updated: 1,
            skipped: 0
        }
    );
}

#[test]
fn test_single_value_scalar() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("counter");
    fs::write(&path, "  123456\n").unwrap();

    let mut registry = test_registry();
    let outcome = collect_single(&mut registry, &path, "cpu_user");
    assert_eq!(
        outcome,
        Outcome::Collected {
            updated: 1,
            skipped: 0
        }
    );
    assert_eq!(value(&registry, "cpu_user"), Some(Value::Counter(123456)));
}

#[test]
fn test_single_value_string_metric() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jobid");
    fs::write(&path, "1957000.IV32627\n").unwrap();

    let mut registry = test_registry();
    collect_single(&mut registry, &path, "node_id");
    assert_eq!(
        value(&registry, "node_id"),
        Some(Value::Text("1957000.IV32627".to_string()))
    );
}

#[test]
fn test_single_value_unparseable_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("counter");
    fs::write(&path, "garbage\n").unwrap();

    let mut registry = test_registry();
    let outcome = collect_single(&mut registry, &path, "cpu_user");
    assert_eq!(outcome, Outcome::SourceUnavailable);
    assert_eq!(value(&registry, "cpu_user"), None);
}

#[test]
fn test_single_value_missing_file_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let mut registry = test_registry();
    let outcome = collect_single(&mut registry, dir.path().join("nope"), "cpu_user");
    assert_eq!(outcome, Outcome::SourceUnavailable);
    assert_eq!(value(&registry, "cpu_user"), None);
}

#[test]
fn test_unknown_metric_name_is_unavailable_not_panic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("counter");
    fs::write(&path, "1\n").unwrap();

    let mut registry = test_registry();
    let outcome = collect_single(&mut registry, &path, "not_in_schema");
    assert_eq!(outcome, Outcome::SourceUnavailable);
}
