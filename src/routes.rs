//! HTTP router and handlers
//!
//! Wires the components together: `/` liveness, `/moderate` (prompt build +
//! classification), `/health` (metrics snapshot with CORS), and the
//! `/health` preflight. Handlers share immutable state only.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

use crate::auth::KeyValidator;
use crate::classifier::{Classifier, GeminiClassifier};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::health::HealthReporter;
use crate::prompt;

/// Header carrying the client key for `/moderate`
pub const MODERATE_KEY_HEADER: &str = "client-api-key";

/// Header carrying the client key for `/health`
pub const HEALTH_KEY_HEADER: &str = "x-api-key";

/// Inbound moderation request body
#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    /// The post text to classify
    pub post: String,
}

/// Shared state behind every handler, immutable after start-up
#[derive(Clone)]
pub struct AppState {
    classifier: Arc<dyn Classifier>,
    validator: Arc<KeyValidator>,
    reporter: Arc<HealthReporter>,
}

impl AppState {
    /// Build production state from the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(GeminiClassifier::from_config(config)?),
            KeyValidator::from_config(config),
        ))
    }

    /// Build state with an explicit classifier (tests substitute a stub here)
    pub fn new(classifier: Arc<dyn Classifier>, validator: KeyValidator) -> Self {
        Self {
            classifier,
            validator: Arc::new(validator),
            reporter: Arc::new(HealthReporter::new()),
        }
    }
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/moderate", post(moderate))
        .route("/health", get(health).options(health_preflight))
        .with_state(state)
}

/// Liveness probe, unauthenticated
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "status": "moderation server running" }))
}

/// Classify a post: validate the client key, build the prompt, relay the label
async fn moderate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<ModerationRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    state
        .validator
        .validate(header_str(&headers, MODERATE_KEY_HEADER))?;

    let Json(request) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    if request.post.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "post must not be empty".to_string(),
        ));
    }

    let prompt = prompt::build_prompt(&request.post);
    let label = state.classifier.classify(&prompt).await?;
    tracing::info!(label = %label, "post classified");
    Ok(Json(json!({ "label": label })))
}

/// Health snapshot, authenticated; collection runs on a blocking worker
async fn health(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let started = Instant::now();

    match state.validator.validate(header_str(&headers, HEALTH_KEY_HEADER)) {
        Ok(()) => {}
        Err(GatewayError::InvalidApiKey) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": false, "error": "Invalid API key" })),
            )
                .into_response();
        }
        Err(e) => return e.into_response(),
    }

    let reporter = state.reporter.clone();
    let record = match tokio::task::spawn_blocking(move || reporter.collect()).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(error = %e, "health collection task failed");
            return GatewayError::Upstream(format!("Health collection failed: {e}"))
                .into_response();
        }
    };

    let elapsed_ms = started.elapsed().as_millis();
    (
        StatusCode::OK,
        [
            ("X-Server-ID", state.reporter.server_id().to_string()),
            ("X-Response-Time", format!("{elapsed_ms}ms")),
            ("Access-Control-Allow-Origin", "*".to_string()),
        ],
        Json(record),
    )
        .into_response()
}

/// CORS preflight for `/health`; always succeeds, no auth
async fn health_preflight(headers: HeaderMap) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("*")
        .to_string();
    let allow_headers = headers
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(HEALTH_KEY_HEADER)
        .to_string();

    (
        StatusCode::OK,
        [
            ("Access-Control-Allow-Origin", origin),
            ("Access-Control-Allow-Methods", "GET, OPTIONS".to_string()),
            ("Access-Control-Allow-Headers", allow_headers),
            ("Access-Control-Max-Age", "86400".to_string()),
        ],
    )
        .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_reports_running() {
        let Json(body) = root().await;
        assert_eq!(body, json!({ "status": "moderation server running" }));
    }

    #[tokio::test]
    async fn test_preflight_echoes_origin_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, "https://app.example.com".parse().unwrap());
        headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            "x-api-key, content-type".parse().unwrap(),
        );

        let response = health_preflight(headers).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "x-api-key, content-type"
        );
        assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
    }

    #[tokio::test]
    async fn test_preflight_defaults_without_origin() {
        let response = health_preflight(HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "x-api-key"
        );
    }

    #[test]
    fn test_header_str_ignores_missing() {
        let headers = HeaderMap::new();
        assert_eq!(header_str(&headers, "client-api-key"), None);
    }
}
