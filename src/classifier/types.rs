//! Gemini wire types
//!
//! The subset of the generateContent request/response envelope the gateway
//! exchanges with the API. Response fields are optional so a sparse or
//! unexpected envelope deserializes instead of erroring early.

use serde::{Deserialize, Serialize};

/// generateContent request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    /// Wrap a prompt in the single-content, single-part envelope
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: Some(vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }]),
                role: None,
            }],
        }
    }
}

/// Gemini content structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<GeminiPart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Gemini part structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// generateContent response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<GeminiCandidate>>,
}

/// Gemini candidate structure
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// First candidate's first non-blank text part, if present.
    ///
    /// Text that trims to nothing counts as missing; a blank label must
    /// never reach callers.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
