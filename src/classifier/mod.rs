//! Classification backends
//!
//! [`Classifier`] is the seam between the router and the hosted model.
//! Production uses [`GeminiClassifier`]; tests substitute a deterministic
//! stub so endpoint behavior can be asserted without a live model.

mod gemini;
mod types;

pub use gemini::GeminiClassifier;
pub use types::{GeminiCandidate, GeminiContent, GeminiPart};
pub use types::{GenerateContentRequest, GenerateContentResponse};

use async_trait::async_trait;

use crate::error::Result;

/// Classifies a moderation prompt into a label
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Send the prompt to the backend and return the trimmed,
    /// lower-cased label text
    async fn classify(&self, prompt: &str) -> Result<String>;
}
