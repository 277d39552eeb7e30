//! OpenAI-compatible embeddings client.
//!
//! Speaks the `/embeddings` endpoint shared by OpenAI, Voyage AI, and
//! compatible providers. Connectivity and auth failures are tagged
//! `DriftlineError::EmbedderUnavailable` so callers can tell "the service is
//! down" apart from "this input failed".

mod client;
mod types;

pub use client::Embedder;
