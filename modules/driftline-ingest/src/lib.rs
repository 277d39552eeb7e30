//! Content ingestion and deduplication pipeline.
//!
//! Consumes batches of discovery messages produced by channel scrapers.
//! Each message is parsed, deduplicated against the store by canonical URL,
//! optionally enriched with a semantic embedding, and persisted. Per-item
//! failures never abort the batch; only operational failures of the store or
//! the enrichment service escalate to the hosting queue infrastructure.

pub mod decision;
pub mod dispatcher;
mod enrich;
pub mod metrics;
pub mod traits;

pub use decision::{ingest_action, IngestAction, SkipReason};
pub use dispatcher::IngestDispatcher;
pub use metrics::{BatchStats, LogMetricsSink, MetricUnit};
pub use traits::{ContentStore, MetricsSink, UserPrefs};
