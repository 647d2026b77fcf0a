//! # modgate
//!
//! A small HTTP moderation gateway. It receives a social-media post, builds
//! a fixed classification prompt, forwards it to a hosted Gemini model, and
//! relays the single-word label the model returns.
//!
//! Around that core sit three incremental concerns:
//!
//! - **Auth**: clients present a raw secret; the server verifies a salted
//!   SHA-256 digest against a configured allow-list
//! - **Keep-alive**: a background self-ping defeats host idle-sleep on
//!   free-tier platforms
//! - **Health**: an authenticated endpoint reporting host/process metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use modgate::{AppState, GatewayConfig, routes};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env();
//! let state = AppState::from_config(&config)?;
//! let app = routes::router(state);
//!
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Client API key verification
pub mod auth;

/// Classification backends (the hosted-model seam)
pub mod classifier;

/// Environment-derived gateway configuration
pub mod config;

/// Error taxonomy and HTTP status mapping
pub mod error;

/// Host and process health metrics
pub mod health;

/// Background self-ping loop
pub mod keepalive;

/// Classification prompt template
pub mod prompt;

/// HTTP router and handlers
pub mod routes;

pub use auth::{KeyValidator, hash_client_key};
pub use classifier::{Classifier, GeminiClassifier};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use health::{HealthRecord, HealthReporter};
pub use prompt::{CATEGORIES, build_prompt};
pub use routes::{AppState, ModerationRequest, router};
