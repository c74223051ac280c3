// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for redisearch-builder.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for installing an exporter.
//!
//! # Metric Naming Convention
//! - `redisearch_builder_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `command`: FT.SEARCH, FT.AGGREGATE, HSET, ...
//! - `status`: success, error
//! - `kind`: validation failure category

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a command handed to the transport
pub fn record_command(command: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    counter!(
        "redisearch_builder_commands_total",
        "command" => command.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record round-trip latency of a command
pub fn record_command_latency(command: &str, duration: Duration) {
    histogram!(
        "redisearch_builder_command_seconds",
        "command" => command.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a local validation failure (never reached the transport)
pub fn record_validation_failure(kind: &str) {
    counter!(
        "redisearch_builder_validation_failures_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record number of documents in a search reply
pub fn record_search_results(count: usize) {
    histogram!("redisearch_builder_search_results").record(count as f64);
}

/// A timing guard that records command latency on drop
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        record_command_latency(&self.command, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No recorder is installed; these only check the calls don't panic.

    #[test]
    fn test_command_metrics() {
        record_command("FT.SEARCH", true);
        record_command("FT.CREATE", false);
        record_command_latency("FT.SEARCH", Duration::from_micros(250));
        record_search_results(3);
    }

    #[test]
    fn test_validation_metrics() {
        record_validation_failure("schema_validation");
        record_validation_failure("field_type_mismatch");
    }

    #[test]
    fn test_command_timer() {
        {
            let _timer = CommandTimer::new("FT.AGGREGATE");
        }
        // recorded on drop
    }
}
