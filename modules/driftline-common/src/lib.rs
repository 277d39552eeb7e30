pub mod config;
pub mod embed;
pub mod error;
pub mod types;

pub use config::Config;
pub use embed::{NoOpEmbedder, TextEmbedder};
pub use error::DriftlineError;
pub use types::*;
