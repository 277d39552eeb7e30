//! Best-effort embedding enrichment.
//!
//! An embedding is a bonus, never a requirement: per-item failures and empty
//! vectors both mean "continue without enrichment". The only error that
//! escapes this step is one tagged critical by the embedding client — the
//! service itself is down, which must abort the batch.

use anyhow::Result;
use tracing::{debug, warn};

use driftline_common::error::is_critical_failure;
use driftline_common::TextEmbedder;

/// Build the text handed to the embedder: title and description joined by a
/// single space, description omitted when absent.
pub(crate) fn embed_text(title: &str, description: Option<&str>) -> String {
    match description {
        Some(desc) => format!("{title} {desc}"),
        None => title.to_string(),
    }
}

/// Embed the message text, absorbing per-item failures.
///
/// Returns `Ok(None)` when the call failed non-critically or produced an
/// empty vector. Returns `Err` only for critical embedder failures.
pub(crate) async fn best_effort_embedding(
    embedder: &dyn TextEmbedder,
    title: &str,
    description: Option<&str>,
) -> Result<Option<Vec<f32>>> {
    let text = embed_text(title, description);

    match embedder.embed(&text).await {
        Ok(vector) if vector.is_empty() => {
            debug!(title, "embedder returned an empty vector, continuing without enrichment");
            Ok(None)
        }
        Ok(vector) => Ok(Some(vector)),
        Err(e) if is_critical_failure(&e) => Err(e),
        Err(e) => {
            warn!(title, error = %e, "embedding failed, continuing without enrichment");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use driftline_common::DriftlineError;

    struct FixedEmbedder(Result<Vec<f32>, &'static str>);

    #[async_trait]
    impl TextEmbedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(msg) => Err(anyhow::anyhow!(*msg)),
            }
        }
    }

    struct DownEmbedder;

    #[async_trait]
    impl TextEmbedder for DownEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(anyhow::Error::new(DriftlineError::EmbedderUnavailable(
                "connect refused".into(),
            )))
        }
    }

    #[test]
    fn embed_text_joins_with_single_space() {
        assert_eq!(
            embed_text("Rust at the edge", Some("notes on WASM")),
            "Rust at the edge notes on WASM"
        );
    }

    #[test]
    fn embed_text_omits_absent_description() {
        assert_eq!(embed_text("Rust at the edge", None), "Rust at the edge");
    }

    #[tokio::test]
    async fn success_returns_vector() {
        let embedder = FixedEmbedder(Ok(vec![0.1, 0.2]));
        let result = best_effort_embedding(&embedder, "t", None).await.unwrap();
        assert_eq!(result, Some(vec![0.1, 0.2]));
    }

    #[tokio::test]
    async fn empty_vector_means_no_enrichment() {
        let embedder = FixedEmbedder(Ok(vec![]));
        let result = best_effort_embedding(&embedder, "t", None).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn plain_failure_is_absorbed() {
        let embedder = FixedEmbedder(Err("model choked on this input"));
        let result = best_effort_embedding(&embedder, "t", Some("d")).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn critical_failure_escapes() {
        let result = best_effort_embedding(&DownEmbedder, "t", None).await;
        assert!(is_critical_failure(&result.unwrap_err()));
    }
}
