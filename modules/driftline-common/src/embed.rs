use anyhow::Result;
use async_trait::async_trait;

/// Text-to-vector port. Lives here so adapter crates can implement it
/// without depending on the ingest pipeline.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a single text into a fixed-length vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// No-op embedder for contexts that don't need embeddings (dry runs, tests).
/// Returns an empty vector, which the enrichment step treats as "no result".
pub struct NoOpEmbedder;

#[async_trait]
impl TextEmbedder for NoOpEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![])
    }
}
