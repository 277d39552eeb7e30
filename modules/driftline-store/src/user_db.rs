use anyhow::{anyhow, Result};
use sqlx::PgPool;
use uuid::Uuid;

use driftline_common::Visibility;

use crate::classify;

/// User preference lookups. The Private fallback for failed lookups belongs
/// to the caller, not here — this adapter reports what it finds.
#[derive(Clone)]
pub struct UserDb {
    pool: PgPool,
}

impl UserDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn default_visibility(&self, user_id: Uuid) -> Result<Visibility> {
        let row = sqlx::query_as::<_, (String,)>(
            "SELECT default_visibility FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        match row {
            Some((value,)) => value.parse(),
            None => Err(anyhow!("no such user: {user_id}")),
        }
    }
}
