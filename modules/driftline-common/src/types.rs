use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

/// Who may see a content record. Resolved server-side from the owning user's
/// default — never taken from a discovery message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Most restrictive; the fallback whenever resolution fails.
    #[default]
    Private,
    /// Platform members only.
    Internal,
    Community,
    Public,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Internal => write!(f, "internal"),
            Visibility::Community => write!(f, "community"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            "community" => Ok(Visibility::Community),
            "public" => Ok(Visibility::Public),
            other => Err(anyhow::anyhow!("unknown visibility: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    Video,
    Podcast,
    Newsletter,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Article => write!(f, "article"),
            ContentType::Video => write!(f, "video"),
            ContentType::Podcast => write!(f, "podcast"),
            ContentType::Newsletter => write!(f, "newsletter"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(ContentType::Article),
            "video" => Ok(ContentType::Video),
            "podcast" => Ok(ContentType::Podcast),
            "newsletter" => Ok(ContentType::Newsletter),
            other => Err(anyhow::anyhow!("unknown content type: {other}")),
        }
    }
}

// --- Discovery Message ---

/// One content candidate, as produced by a channel scraper. The canonical
/// `url` is the sole dedup key across ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryMessage {
    pub user_id: Uuid,
    pub channel_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content_type: ContentType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// --- Content Record ---

/// A persisted content item. `embedding` is optional at all times: absence
/// means "not yet enriched" or "enrichment unavailable", never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub visibility: Visibility,
    pub urls: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a first-sighting create. Tags start empty; the embedding, if
/// any, is attached afterwards via a separate update.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub visibility: Visibility,
    pub urls: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
}

/// Partial update applied by `update_with_embedding`. Only fields that are
/// `Some` are overwritten; everything else keeps its stored value.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub embedding: Option<Vec<f32>>,
    pub metadata: Option<serde_json::Value>,
}
