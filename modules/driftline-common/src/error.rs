use thiserror::Error;

/// Platform error taxonomy.
///
/// The `*Unavailable` variants mark operational failures of a dependency as a
/// whole (the store or the enrichment service is down, not one bad item).
/// They are constructed by the layer that detects the failure; the batch
/// dispatcher classifies by downcasting, never by inspecting message text.
#[derive(Error, Debug)]
pub enum DriftlineError {
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("embedding service unavailable: {0}")]
    EmbedderUnavailable(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl DriftlineError {
    /// True for failures that must abort the remainder of a batch and be
    /// retried by the hosting queue infrastructure.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            DriftlineError::StoreUnavailable(_) | DriftlineError::EmbedderUnavailable(_)
        )
    }
}

/// True if any error in this `anyhow` chain is a critical `DriftlineError`.
pub fn is_critical_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<DriftlineError>())
        .any(DriftlineError::is_critical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_variants_are_critical() {
        assert!(DriftlineError::StoreUnavailable("pool closed".into()).is_critical());
        assert!(DriftlineError::EmbedderUnavailable("connect refused".into()).is_critical());
    }

    #[test]
    fn item_level_variants_are_not_critical() {
        assert!(!DriftlineError::Database("row decode".into()).is_critical());
        assert!(!DriftlineError::Embedding("bad input".into()).is_critical());
        assert!(!DriftlineError::Validation("missing title".into()).is_critical());
    }

    #[test]
    fn critical_marker_survives_context_wrapping() {
        let err = anyhow::Error::new(DriftlineError::StoreUnavailable("down".into()))
            .context("creating content for https://example.com/a");
        assert!(is_critical_failure(&err));
    }

    #[test]
    fn plain_errors_are_not_critical() {
        let err = anyhow::anyhow!("something item-specific went wrong");
        assert!(!is_critical_failure(&err));
    }
}
