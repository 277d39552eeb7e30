//! Postgres adapters for the content store and user-preference ports.
//!
//! Schema and migrations are owned by the platform, not this crate. The
//! adapters expect:
//!
//! ```text
//! content(id uuid PK, user_id uuid, title text, description text,
//!         content_type text, visibility text, urls text[],
//!         publish_date timestamptz, tags text[], embedding real[],
//!         metadata jsonb, created_at timestamptz, updated_at timestamptz)
//! users(id uuid PK, default_visibility text)
//! ```
//!
//! Concurrent-writer safety on the canonical URL (two invocations racing on
//! the same content) is the platform schema's job — a uniqueness constraint
//! on the canonical URL — not re-solved here.
//!
//! Connection- and pool-level failures are tagged
//! `DriftlineError::StoreUnavailable` so the batch dispatcher can tell "the
//! store is down" apart from "this row is bad".

mod content_db;
mod user_db;

pub use content_db::ContentDb;
pub use user_db::UserDb;

pub(crate) fn classify(e: sqlx::Error) -> anyhow::Error {
    use driftline_common::DriftlineError;
    match &e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => {
            anyhow::Error::new(DriftlineError::StoreUnavailable(e.to_string()))
        }
        _ => anyhow::Error::new(DriftlineError::Database(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftline_common::error::is_critical_failure;

    #[test]
    fn pool_failures_are_critical() {
        assert!(is_critical_failure(&classify(sqlx::Error::PoolClosed)));
        assert!(is_critical_failure(&classify(sqlx::Error::PoolTimedOut)));
        assert!(is_critical_failure(&classify(sqlx::Error::Protocol(
            "unexpected packet".into()
        ))));
    }

    #[test]
    fn row_failures_are_not_critical() {
        assert!(!is_critical_failure(&classify(sqlx::Error::RowNotFound)));
        assert!(!is_critical_failure(&classify(
            sqlx::Error::ColumnNotFound("embedding".into())
        )));
    }
}
