//! Generic collection primitives.
//!
//! Every subsystem probe is built from two operations: bulk ingestion of
//! a `label<sep>value` file, and ingestion of a single-scalar file. Both
//! treat a missing or unreadable source as data ("source unavailable"),
//! never as an error that could abort a polling cycle.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::registry::{RawValue, Registry};
use crate::schema::MetricKind;

/// How a key-value file separates the label from the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `MemTotal:       16316912 kB`
    Colon,
    /// `pgpgin 123456`
    Whitespace,
}

/// Result of one collector call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The source file was read; `updated` lines resolved to a slot and
    /// parsed, `skipped` lines resolved to a slot but failed to parse.
    Collected { updated: usize, skipped: usize },
    /// The source file was missing or unreadable (or, for a single-value
    /// source, its content did not parse). Target slots stay absent for
    /// this cycle.
    SourceUnavailable,
}

/// Ingests a file of repeated `label<sep>value` lines.
///
/// Each label is prefixed with `prefix` and resolved through the
/// registry; unknown labels and lines that do not match the pattern are
/// silently ignored, since system files are routinely a superset of the
/// tracked namespace. A line whose value cannot be parsed as the
/// descriptor's declared type is skipped without abandoning the rest of
/// the file. When the same label occurs twice, the last occurrence wins.
///
/// Numeric values take the first whitespace token of the remainder, so
/// trailing unit suffixes (`16316912 kB`) and trailing columns (Lustre
/// `stats` rows) parse without per-file code. STRING metrics take the
/// whole trimmed remainder.
pub fn collect_key_value(
    registry: &mut Registry,
    path: impl AsRef<Path>,
    separator: Separator,
    prefix: &str,
) -> Outcome {
    collect_key_value_mapped(registry, path, separator, prefix, &[])
}

/// [`collect_key_value`] for files whose labels do not all match their
/// metric suffix: a label found in `aliases` resolves to the paired
/// full metric name instead of `prefix` + label. Everything else reads
/// identically.
pub fn collect_key_value_mapped(
    registry: &mut Registry,
    path: impl AsRef<Path>,
    separator: Separator,
    prefix: &str,
    aliases: &[(&str, &str)],
) -> Outcome {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "source unavailable");
            return Outcome::SourceUnavailable;
        }
    };

    let mut updated = 0;
    let mut skipped = 0;

    for line in content.lines() {
        let Some((label, remainder)) = split_line(line, separator) else {
            continue;
        };
        let label = label.trim();
        let remainder = remainder.trim();
        if label.is_empty() || remainder.is_empty() {
            continue;
        }

        let alias = aliases
            .iter()
            .find(|(raw, _)| *raw == label)
            .map(|(_, name)| *name);
        let name: Cow<'_, str> = match alias {
            Some(name) => Cow::Borrowed(name),
            None if prefix.is_empty() => Cow::Borrowed(label),
            None => Cow::Owned(format!("{prefix}{label}")),
        };
        let Some(id) = registry.lookup(&name) else {
            continue;
        };

        match parse_raw(registry.descriptor(id).kind, remainder) {
            Some(raw) => {
                registry.set_value(id, raw);
                updated += 1;
            }
            None => {
                tracing::debug!(
                    path = %path.display(),
                    metric = %name,
                    value = remainder,
                    "unparseable value, line skipped"
                );
                skipped += 1;
            }
        }
    }

    Outcome::Collected { updated, skipped }
}

/// Reads one file whose entire (trimmed) content is a single scalar and
/// stores it into the named slot. A missing file, an unknown metric name
/// or an unparseable content all yield `SourceUnavailable` for this
/// metric this cycle.
pub fn collect_single(registry: &mut Registry, path: impl AsRef<Path>, metric: &str) -> Outcome {
    let path = path.as_ref();
    let Some(id) = registry.lookup(metric) else {
        tracing::debug!(metric, "single-value target not in schema");
        return Outcome::SourceUnavailable;
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "source unavailable");
            return Outcome::SourceUnavailable;
        }
    };

    let scalar = content.trim();
    if scalar.is_empty() {
        return Outcome::SourceUnavailable;
    }

    match parse_scalar(registry.descriptor(id).kind, scalar) {
        Some(raw) => {
            registry.set_value(id, raw);
            Outcome::Collected {
                updated: 1,
                skipped: 0,
            }
        }
        None => {
            tracing::debug!(
                path = %path.display(),
                metric,
                value = scalar,
                "unparseable scalar"
            );
            Outcome::SourceUnavailable
        }
    }
}

fn split_line(line: &str, separator: Separator) -> Option<(&str, &str)> {
    match separator {
        Separator::Colon => line.split_once(':'),
        Separator::Whitespace => line.split_once(char::is_whitespace),
    }
}

/// First-token numeric conversion for key-value remainders.
fn parse_raw(kind: MetricKind, remainder: &str) -> Option<RawValue> {
    match kind {
        MetricKind::Text => Some(RawValue::Text(remainder.to_string())),
        _ => {
            let token = remainder.split_whitespace().next()?;
            parse_scalar(kind, token)
        }
    }
}

fn parse_scalar(kind: MetricKind, token: &str) -> Option<RawValue> {
    match kind {
        MetricKind::Counter => token.parse::<u64>().ok().map(RawValue::Int),
        MetricKind::Gauge => token.parse::<f64>().ok().map(RawValue::Float),
        MetricKind::Text => Some(RawValue::Text(token.to_string())),
    }
}
