//! Gemini classification backend
//!
//! Posts the prompt to the generateContent endpoint and extracts the label
//! from the first candidate. Any transport, status, or envelope failure is
//! surfaced as an upstream error; there is no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};

use super::Classifier;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Classification client backed by the hosted Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    http_client: HttpClient,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl GeminiClassifier {
    /// Create a classifier from the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout.unwrap_or(30));
        let http_client = HttpClient::builder().timeout(timeout).build().map_err(|e| {
            GatewayError::Misconfigured(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            http_client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| GatewayError::Misconfigured("GEMINI_API_KEY is not set".to_string()))?;

        let url = self.request_url();
        let request = GenerateContentRequest::from_prompt(prompt);

        tracing::debug!(model = %self.model, "forwarding prompt to Gemini");
        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Upstream(format!(
                "Gemini API error {status}: {error_text}"
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to parse Gemini response: {e}")))?;

        let label = envelope.first_text().ok_or_else(|| {
            GatewayError::Upstream("Gemini response contained no candidate text".to_string())
        })?;

        Ok(label.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_for(base_url: &str, model: &str) -> GeminiClassifier {
        let config = GatewayConfig::default()
            .with_gemini_api_key("test-key")
            .with_gemini_base_url(base_url)
            .with_gemini_model(model);
        GeminiClassifier::from_config(&config).unwrap()
    }

    #[test]
    fn test_request_url() {
        let classifier = classifier_for("https://generativelanguage.googleapis.com/v1beta", "gemini-pro");
        assert_eq!(
            classifier.request_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_url_trims_trailing_slash() {
        let classifier = classifier_for("http://localhost:9999/", "gemini-pro");
        assert_eq!(
            classifier.request_url(),
            "http://localhost:9999/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_classify_without_api_key_is_misconfigured() {
        let classifier = GeminiClassifier::from_config(&GatewayConfig::default()).unwrap();
        let err = classifier.classify("prompt").await.unwrap_err();
        assert!(matches!(err, GatewayError::Misconfigured(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
