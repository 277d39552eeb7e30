use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use driftline_common::{ContentPatch, ContentRecord, NewContent};

use crate::classify;

const CONTENT_COLUMNS: &str = "id, user_id, title, description, content_type, visibility, \
     urls, publish_date, tags, embedding, metadata, created_at, updated_at";

/// Content table adapter. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct ContentDb {
    pool: PgPool,
}

impl ContentDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up the record whose URL list contains this canonical URL.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<ContentRecord>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE $1 = ANY(urls)"
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        row.map(ContentRow::into_record).transpose()
    }

    /// Create the first record for a URL. Tags start empty.
    pub async fn create(&self, content: NewContent) -> Result<ContentRecord> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            r#"
            INSERT INTO content
                (id, user_id, title, description, content_type, visibility,
                 urls, publish_date, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '{{}}', now(), now())
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(content.user_id)
        .bind(&content.title)
        .bind(&content.description)
        .bind(content.content_type.to_string())
        .bind(content.visibility.to_string())
        .bind(&content.urls)
        .bind(content.publish_date)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        row.into_record()
    }

    /// Apply a partial update; only `Some` fields in the patch are written.
    pub async fn update_with_embedding(
        &self,
        id: Uuid,
        patch: ContentPatch,
    ) -> Result<ContentRecord> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            r#"
            UPDATE content SET
                title        = COALESCE($2, title),
                description  = COALESCE($3, description),
                publish_date = COALESCE($4, publish_date),
                embedding    = COALESCE($5, embedding),
                metadata     = COALESCE($6, metadata),
                updated_at   = now()
            WHERE id = $1
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.publish_date)
        .bind(&patch.embedding)
        .bind(&patch.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        row.into_record()
    }
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    content_type: String,
    visibility: String,
    urls: Vec<String>,
    publish_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    embedding: Option<Vec<f32>>,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentRow {
    fn into_record(self) -> Result<ContentRecord> {
        Ok(ContentRecord {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            content_type: self.content_type.parse()?,
            visibility: self.visibility.parse()?,
            urls: self.urls,
            publish_date: self.publish_date,
            tags: self.tags,
            embedding: self.embedding,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
