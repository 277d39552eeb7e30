//! Batch dispatcher.
//!
//! Entry point for one queue invocation: a batch of serialized discovery
//! messages. Messages are handled strictly one at a time, in arrival order,
//! each inside its own failure boundary, so one bad message never takes the
//! rest of the batch with it. Only critical failures — the store or the
//! enrichment service is down — re-raise past the loop, handing the whole
//! invocation back to the queue host's redrive policy.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use driftline_common::error::is_critical_failure;
use driftline_common::{
    ContentPatch, DiscoveryMessage, NewContent, TextEmbedder, Visibility,
};

use crate::decision::{ingest_action, IngestAction};
use crate::enrich::best_effort_embedding;
use crate::metrics::{emit_batch_metrics, BatchStats};
use crate::traits::{ContentStore, MetricsSink, UserPrefs};

/// What happened to one successfully handled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
    Skipped,
}

/// Bundles the pipeline's injected dependencies and runs batches.
pub struct IngestDispatcher {
    store: Arc<dyn ContentStore>,
    prefs: Arc<dyn UserPrefs>,
    embedder: Arc<dyn TextEmbedder>,
    metrics: Arc<dyn MetricsSink>,
}

impl IngestDispatcher {
    pub fn new(
        store: Arc<dyn ContentStore>,
        prefs: Arc<dyn UserPrefs>,
        embedder: Arc<dyn TextEmbedder>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            store,
            prefs,
            embedder,
            metrics,
        }
    }

    /// Process one batch of raw message bodies.
    ///
    /// All messages are attempted unless a critical failure aborts the
    /// invocation; in that case a final metrics report still covers the work
    /// done so far, and the error re-raises to the caller.
    pub async fn handle_batch(&self, bodies: &[String]) -> Result<BatchStats> {
        let started = Instant::now();
        let mut stats = BatchStats::default();

        for (index, body) in bodies.iter().enumerate() {
            match self.process_raw(body).await {
                Ok(outcome) => {
                    stats.processed += 1;
                    match outcome {
                        Outcome::Created => stats.created += 1,
                        Outcome::Updated => stats.updated += 1,
                        Outcome::Skipped => stats.skipped += 1,
                    }
                }
                Err(e) if is_critical_failure(&e) => {
                    error!(index, error = %e, "critical failure, aborting batch");
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    emit_batch_metrics(self.metrics.as_ref(), &stats, elapsed_ms).await;
                    return Err(e);
                }
                Err(e) => {
                    warn!(index, error = %e, "message failed, continuing");
                    stats.failed += 1;
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        emit_batch_metrics(self.metrics.as_ref(), &stats, elapsed_ms).await;
        info!(
            processed = stats.processed,
            failed = stats.failed,
            elapsed_ms,
            "batch complete"
        );

        Ok(stats)
    }

    async fn process_raw(&self, body: &str) -> Result<Outcome> {
        let message: DiscoveryMessage =
            serde_json::from_str(body).context("malformed discovery message")?;
        self.process_message(&message).await
    }

    async fn process_message(&self, msg: &DiscoveryMessage) -> Result<Outcome> {
        let visibility = self.resolve_visibility(msg.user_id).await;

        let existing = self
            .store
            .find_by_url(&msg.url)
            .await
            .with_context(|| format!("dedup lookup failed for {}", msg.url))?;

        match ingest_action(msg, existing.as_ref()) {
            IngestAction::Skip { reason } => {
                debug!(url = msg.url.as_str(), ?reason, "skipping duplicate");
                Ok(Outcome::Skipped)
            }
            IngestAction::Create => {
                self.create_content(msg, visibility).await?;
                Ok(Outcome::Created)
            }
            IngestAction::Update { existing_id } => {
                self.update_content(msg, existing_id).await?;
                Ok(Outcome::Updated)
            }
        }
    }

    /// First sighting: create the base record, then attach the embedding via
    /// a distinct update — the record must exist regardless of enrichment.
    async fn create_content(&self, msg: &DiscoveryMessage, visibility: Visibility) -> Result<()> {
        let record = self
            .store
            .create(NewContent {
                user_id: msg.user_id,
                title: msg.title.clone(),
                description: msg.description.clone(),
                content_type: msg.content_type,
                visibility,
                urls: vec![msg.url.clone()],
                publish_date: msg.publish_date,
            })
            .await
            .with_context(|| format!("create failed for {}", msg.url))?;

        info!(id = %record.id, url = msg.url.as_str(), %visibility, "content created");

        if let Some(embedding) =
            best_effort_embedding(self.embedder.as_ref(), &msg.title, msg.description.as_deref())
                .await?
        {
            self.store
                .update_with_embedding(
                    record.id,
                    ContentPatch {
                        embedding: Some(embedding),
                        metadata: msg.metadata.clone(),
                        ..Default::default()
                    },
                )
                .await
                .with_context(|| format!("embedding update failed for {}", msg.url))?;
        }

        Ok(())
    }

    /// Strictly newer sighting: one update call replaces the content fields;
    /// embedding and metadata ride along only when enrichment succeeded.
    async fn update_content(&self, msg: &DiscoveryMessage, existing_id: Uuid) -> Result<()> {
        let embedding =
            best_effort_embedding(self.embedder.as_ref(), &msg.title, msg.description.as_deref())
                .await?;

        let mut patch = ContentPatch {
            title: Some(msg.title.clone()),
            description: msg.description.clone(),
            publish_date: msg.publish_date,
            ..Default::default()
        };
        if embedding.is_some() {
            patch.embedding = embedding;
            patch.metadata = msg.metadata.clone();
        }

        self.store
            .update_with_embedding(existing_id, patch)
            .await
            .with_context(|| format!("update failed for {}", msg.url))?;

        info!(id = %existing_id, url = msg.url.as_str(), "content updated");
        Ok(())
    }

    /// Resolve the owning user's default visibility. Never fatal: any
    /// failure falls back to the most restrictive value.
    async fn resolve_visibility(&self, user_id: Uuid) -> Visibility {
        match self.prefs.default_visibility(user_id).await {
            Ok(visibility) => visibility,
            Err(e) => {
                warn!(%user_id, error = %e, "visibility lookup failed, falling back to private");
                Visibility::Private
            }
        }
    }
}
