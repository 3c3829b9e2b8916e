//! Snapshot publishing.
//!
//! After each completed cycle the driver hands the registry to a
//! `Reporter`, which serializes one JSON line per cycle: host, UTC
//! timestamp, cycle number, and every metric in namespace order. A
//! metric that was not collected this cycle is published as `null` --
//! staleness is visible to the pipeline, never masked by a frozen or
//! zeroed value. COUNTER metrics that were present in two consecutive
//! cycles additionally carry a per-second `rate` derived from the
//! registry's delta helper.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::{Registry, Value};
use crate::schema::MetricKind;

#[derive(Serialize)]
struct CycleRecord<'a> {
    host: &'a str,
    timestamp: DateTime<Utc>,
    cycle: u64,
    metrics: Vec<MetricRecord<'a>>,
}

#[derive(Serialize)]
struct MetricRecord<'a> {
    name: &'a str,
    kind: &'static str,
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    saturated: bool,
}

/// Writes one JSON line per polling cycle to the configured sink.
pub struct Reporter {
    out: Box<dyn Write + Send>,
    host: String,
    interval: Duration,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>, interval: Duration) -> Self {
        Self {
            out,
            host: hostname(),
            interval,
        }
    }

    /// Serializes the registry's snapshot as of the last completed cycle.
    pub fn publish(&mut self, registry: &Registry) -> io::Result<()> {
        let interval_secs = self.interval.as_secs_f64();
        let metrics = registry
            .snapshot()
            .map(|reading| {
                let rate = match reading.kind {
                    MetricKind::Counter => registry
                        .lookup(reading.name)
                        .and_then(|id| registry.delta(id))
                        .map(|delta| delta as f64 / interval_secs),
                    _ => None,
                };
                MetricRecord {
                    name: reading.name,
                    kind: reading.kind.as_str(),
                    value: reading.value,
                    rate,
                    saturated: reading.saturated,
                }
            })
            .collect();

        let record = CycleRecord {
            host: &self.host,
            timestamp: Utc::now(),
            cycle: registry.cycle(),
            metrics,
        };

        let line = serde_json::to_string(&record)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

fn hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine host name");
            "unknown".to_string()
        }
    }
}
