//! Gateway configuration
//!
//! A snapshot of the process environment taken once at start-up and passed
//! explicitly into each component. Missing secrets do not prevent the
//! service from booting; the affected endpoints fail per-request instead.

use std::collections::HashSet;
use std::time::Duration;

use secrecy::SecretString;

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Interval between keep-alive self-pings
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(600);

/// Gateway configuration parameters
#[derive(Clone)]
pub struct GatewayConfig {
    /// Port the HTTP server listens on
    pub port: u16,
    /// API key for the upstream Gemini backend (securely stored)
    pub gemini_api_key: Option<SecretString>,
    /// Base URL for the Gemini API
    pub gemini_base_url: String,
    /// Model used for classification
    pub gemini_model: String,
    /// Salt mixed into client key digests (securely stored)
    pub api_key_salt: Option<SecretString>,
    /// Accepted client key digests, lowercase hex
    pub hashed_api_keys: HashSet<String>,
    /// Externally-reachable base URL; enables the keep-alive loop when set
    pub external_url: Option<String>,
    /// Keep-alive self-ping interval
    pub keep_alive_interval: Duration,
    /// HTTP timeout in seconds for upstream calls
    pub timeout: Option<u64>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("port", &self.port)
            .field("gemini_api_key_present", &self.gemini_api_key.is_some())
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("api_key_salt_present", &self.api_key_salt.is_some())
            .field("hashed_api_keys_count", &self.hashed_api_keys.len())
            .field("external_url", &self.external_url)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key_salt: None,
            hashed_api_keys: HashSet::new(),
            external_url: None,
            keep_alive_interval: KEEP_ALIVE_INTERVAL,
            timeout: Some(30),
        }
    }
}

impl GatewayConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `PORT` | listen port | `8000` |
    /// | `GEMINI_API_KEY` | upstream model key | unset |
    /// | `GEMINI_MODEL` | upstream model name | `gemini-pro` |
    /// | `GEMINI_BASE_URL` | upstream base URL | official endpoint |
    /// | `API_KEY_SALT` | salt for client key hashing | unset |
    /// | `HASHED_API_KEYS` | comma-separated lowercase hex digests | empty |
    /// | `RENDER_EXTERNAL_URL` | externally-reachable base URL | unset |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().map(SecretString::from),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            api_key_salt: std::env::var("API_KEY_SALT").ok().map(SecretString::from),
            hashed_api_keys: std::env::var("HASHED_API_KEYS")
                .map(|v| parse_hashed_keys(&v))
                .unwrap_or_default(),
            external_url: std::env::var("RENDER_EXTERNAL_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            ..defaults
        }
    }

    /// Set the listen port
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the upstream Gemini API key
    pub fn with_gemini_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.gemini_api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the Gemini base URL
    pub fn with_gemini_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.gemini_base_url = base_url.into();
        self
    }

    /// Set the Gemini model
    pub fn with_gemini_model<S: Into<String>>(mut self, model: S) -> Self {
        self.gemini_model = model.into();
        self
    }

    /// Set the client key salt
    pub fn with_api_key_salt<S: Into<String>>(mut self, salt: S) -> Self {
        self.api_key_salt = Some(SecretString::from(salt.into()));
        self
    }

    /// Set the accepted client key digests
    pub fn with_hashed_api_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashed_api_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the externally-reachable base URL
    pub fn with_external_url<S: Into<String>>(mut self, url: S) -> Self {
        self.external_url = Some(url.into());
        self
    }

    /// Set the keep-alive interval
    pub const fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    /// Set the upstream HTTP timeout
    pub const fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Parse a comma-separated digest list, ignoring blanks and surrounding whitespace
fn parse_hashed_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| k.to_ascii_lowercase())
        .collect()
}
