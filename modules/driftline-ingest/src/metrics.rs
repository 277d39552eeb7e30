//! Batch metrics and the end-of-batch report.
//!
//! Metric names are the operational contract: dashboards and alarms key on
//! them. Sink failures are absorbed here — a broken metrics backend must
//! never mask the real outcome of message processing.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::traits::MetricsSink;

pub const MESSAGES_PROCESSED: &str = "MessagesProcessed";
pub const MESSAGES_FAILED: &str = "MessagesFailed";
pub const PROCESSING_TIME: &str = "ProcessingTime";
pub const PROCESSING_RATE: &str = "ProcessingRate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Count,
    Milliseconds,
    CountPerSecond,
}

impl std::fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricUnit::Count => write!(f, "count"),
            MetricUnit::Milliseconds => write!(f, "milliseconds"),
            MetricUnit::CountPerSecond => write!(f, "count/second"),
        }
    }
}

/// Stats from one batch invocation.
#[derive(Debug, Default)]
pub struct BatchStats {
    pub processed: u32,
    pub failed: u32,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Ingest Batch Complete ===")?;
        writeln!(f, "Messages processed: {}", self.processed)?;
        writeln!(f, "Messages failed:    {}", self.failed)?;
        writeln!(f, "  Created: {}", self.created)?;
        writeln!(f, "  Updated: {}", self.updated)?;
        writeln!(f, "  Skipped: {}", self.skipped)?;
        Ok(())
    }
}

/// Messages per second, derived from the elapsed milliseconds.
pub(crate) fn processing_rate(processed: u32, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    processed as f64 / elapsed_ms as f64 * 1000.0
}

/// Emit the four batch metrics, swallowing sink errors.
pub(crate) async fn emit_batch_metrics(sink: &dyn MetricsSink, stats: &BatchStats, elapsed_ms: u64) {
    let rate = processing_rate(stats.processed, elapsed_ms);
    let emissions = [
        (MESSAGES_PROCESSED, stats.processed as f64, MetricUnit::Count),
        (MESSAGES_FAILED, stats.failed as f64, MetricUnit::Count),
        (PROCESSING_TIME, elapsed_ms as f64, MetricUnit::Milliseconds),
        (PROCESSING_RATE, rate, MetricUnit::CountPerSecond),
    ];
    for (name, value, unit) in emissions {
        if let Err(e) = sink.emit(name, value, unit).await {
            warn!(metric = name, error = %e, "failed to emit metric");
        }
    }
}

/// Default production sink: emits metrics as structured log events.
pub struct LogMetricsSink;

#[async_trait]
impl MetricsSink for LogMetricsSink {
    async fn emit(&self, name: &str, value: f64, unit: MetricUnit) -> Result<()> {
        info!(metric = name, value, unit = %unit, "metric");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_messages_per_second() {
        // 10 messages in 2000ms = 5/s
        assert_eq!(processing_rate(10, 2000), 5.0);
    }

    #[test]
    fn rate_is_zero_for_instant_batches() {
        assert_eq!(processing_rate(10, 0), 0.0);
    }

    #[test]
    fn rate_is_zero_when_nothing_processed() {
        assert_eq!(processing_rate(0, 1500), 0.0);
    }

    #[test]
    fn stats_report_includes_counts() {
        let stats = BatchStats {
            processed: 7,
            failed: 2,
            created: 4,
            updated: 1,
            skipped: 2,
        };
        let report = stats.to_string();
        assert!(report.contains("Messages processed: 7"));
        assert!(report.contains("Messages failed:    2"));
        assert!(report.contains("Created: 4"));
    }
}
