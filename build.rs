// build.rs
//
// Validates schema/metrics.list and compiles it into a static descriptor
// table. An unsorted, duplicated or otherwise malformed schema line aborts
// the build here, so the run-time binary search never has to defend
// against a broken namespace.

use std::env;
use std::fs;
use std::path::PathBuf;

const SCHEMA_PATH: &str = "schema/metrics.list";

fn main() {
    // Generate build info
    vergen::EmitBuilder::builder()
        .all_build()
        .emit()
        .expect("Unable to generate build info");

    println!("cargo:rerun-if-changed={}", SCHEMA_PATH);

    let source = fs::read_to_string(SCHEMA_PATH)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", SCHEMA_PATH, e));

    let table = compile_schema(&source);

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap()).join("schema_table.rs");
    fs::write(&out_path, table).expect("Failed to write generated schema table");
}

/// Validates the authored descriptor list and renders it as Rust source.
///
/// Validation is a pure pass over the list: every line must parse as
/// `name kind unit`, names must use the `[A-Za-z][A-Za-z0-9_]*` charset,
/// and the whole sequence must be strictly ascending by name.
fn compile_schema(source: &str) -> String {
    let mut out = String::new();
    out.push_str("// Generated by build.rs from schema/metrics.list. Do not edit.\n");
    out.push_str("pub(crate) static BUILTIN_DESCRIPTORS: &[MetricDescriptor] = &[\n");

    let mut previous: Option<String> = None;

    for (lineno, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let name = fields.next().unwrap_or_default();
        let kind = fields
            .next()
            .unwrap_or_else(|| schema_error(lineno, line, "missing kind field"));
        let unit = fields
            .next()
            .unwrap_or_else(|| schema_error(lineno, line, "missing unit field"));
        if fields.next().is_some() {
            schema_error(lineno, line, "trailing fields after unit");
        }

        if !valid_name(name) {
            schema_error(lineno, line, "metric name must match [A-Za-z][A-Za-z0-9_]*");
        }

        if let Some(prev) = &previous {
            if name <= prev.as_str() {
                schema_error(
                    lineno,
                    line,
                    "descriptor list must be strictly sorted by name (no duplicates)",
                );
            }
        }
        previous = Some(name.to_string());

        let kind_variant = match kind {
            "counter" => "MetricKind::Counter",
            "gauge" => "MetricKind::Gauge",
            "string" => "MetricKind::Text",
            other => schema_error(lineno, line, &format!("unknown kind {:?}", other)),
        };
        let unit_variant = match unit {
            "none" => "Unit::None",
            "kb" => "Unit::KiB",
            "mb" => "Unit::MiB",
            "w4" => "Unit::Word4",
            other => schema_error(lineno, line, &format!("unknown unit {:?}", other)),
        };

        out.push_str(&format!(
            "    MetricDescriptor {{ name: {:?}, kind: {}, unit: {} }},\n",
            name, kind_variant, unit_variant
        ));
    }

    out.push_str("];\n");
    out
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn schema_error(lineno: usize, line: &str, message: &str) -> ! {
    panic!(
        "{}:{}: {} ({:?})",
        SCHEMA_PATH,
        lineno + 1,
        message,
        line
    )
}
