use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use driftline_common::{DriftlineError, TextEmbedder};

use crate::types::{EmbeddingRequest, EmbeddingResponse};

/// Embeddings client for any OpenAI-compatible provider.
pub struct Embedder {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl Embedder {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: serde_json::Value::String(text.to_string()),
        };

        debug!(model = %self.model, chars = text.len(), "embedding request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // No HTTP response at all: the service itself is unreachable.
                anyhow::Error::new(DriftlineError::EmbedderUnavailable(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            // Auth failures affect every item in the batch, not this one.
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(anyhow::Error::new(DriftlineError::EmbedderUnavailable(
                    format!("auth rejected ({status}): {error_text}"),
                )));
            }
            return Err(anyhow!("embedding API error ({}): {}", status, error_text));
        }

        let embed_response: EmbeddingResponse = response.json().await?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow!("no embedding in response"))
    }
}

#[async_trait]
impl TextEmbedder for Embedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request_embedding(text).await
    }
}
