//! Trait abstractions for the pipeline's dependencies.
//!
//! ContentStore and UserPrefs are narrow, purpose-specific ports — the
//! pipeline never sees a generic CRUD repository. MetricsSink is fire-and-
//! forget: its failures must never affect pipeline correctness.
//!
//! These enable deterministic testing with in-memory fakes: no network, no
//! database. `cargo test` in seconds. The blanket impls at the bottom bridge
//! the concrete Postgres adapters.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use driftline_common::{ContentPatch, ContentRecord, NewContent, Visibility};

use crate::metrics::MetricUnit;

// ---------------------------------------------------------------------------
// ContentStore — persistence port
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up the record whose URL list contains this canonical URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<ContentRecord>>;

    /// Create the first record for a URL.
    async fn create(&self, content: NewContent) -> Result<ContentRecord>;

    /// Apply a partial update; only `Some` fields in the patch are written.
    async fn update_with_embedding(&self, id: Uuid, patch: ContentPatch)
        -> Result<ContentRecord>;
}

// ---------------------------------------------------------------------------
// UserPrefs — default-visibility port
// ---------------------------------------------------------------------------

#[async_trait]
pub trait UserPrefs: Send + Sync {
    /// The user's default content visibility. Errors (including "no such
    /// user") are absorbed by the caller, which falls back to Private.
    async fn default_visibility(&self, user_id: Uuid) -> Result<Visibility>;
}

// ---------------------------------------------------------------------------
// MetricsSink — operational counters/timers
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn emit(&self, name: &str, value: f64, unit: MetricUnit) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Bridges to the Postgres adapters
// ---------------------------------------------------------------------------

#[async_trait]
impl ContentStore for driftline_store::ContentDb {
    async fn find_by_url(&self, url: &str) -> Result<Option<ContentRecord>> {
        self.find_by_url(url).await
    }

    async fn create(&self, content: NewContent) -> Result<ContentRecord> {
        self.create(content).await
    }

    async fn update_with_embedding(
        &self,
        id: Uuid,
        patch: ContentPatch,
    ) -> Result<ContentRecord> {
        self.update_with_embedding(id, patch).await
    }
}

#[async_trait]
impl UserPrefs for driftline_store::UserDb {
    async fn default_visibility(&self, user_id: Uuid) -> Result<Visibility> {
        self.default_visibility(user_id).await
    }
}
