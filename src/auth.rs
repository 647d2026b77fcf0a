//! Client API key verification
//!
//! Clients authenticate with a raw secret; the server holds only a salt and
//! a set of salted SHA-256 digests. A key is accepted when the digest of
//! `key ++ salt` is a member of the configured set.

use std::collections::HashSet;

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Compute the lowercase hex digest of a client key under the given salt
pub fn hash_client_key(key: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validates client keys against the configured digest allow-list
pub struct KeyValidator {
    salt: Option<SecretString>,
    hashed_keys: HashSet<String>,
}

impl KeyValidator {
    /// Create a validator from the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            salt: config.api_key_salt.clone(),
            hashed_keys: config.hashed_api_keys.clone(),
        }
    }

    /// Create a validator from an explicit salt and digest set
    pub fn new<I, S>(salt: Option<SecretString>, hashed_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            salt,
            hashed_keys: hashed_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Check a client-supplied key.
    ///
    /// An absent or empty key is unauthorized. An unconfigured salt is a
    /// server-side failure, not an auth failure.
    pub fn validate(&self, client_key: Option<&str>) -> Result<()> {
        let key = match client_key {
            Some(k) if !k.is_empty() => k,
            _ => {
                tracing::warn!("request rejected: missing or empty client key");
                return Err(GatewayError::InvalidApiKey);
            }
        };

        let salt = self.salt.as_ref().ok_or_else(|| {
            tracing::error!("API_KEY_SALT is not configured");
            GatewayError::Misconfigured("API_KEY_SALT is not set".to_string())
        })?;

        let digest = hash_client_key(key, salt.expose_secret());
        if self.hashed_keys.contains(&digest) {
            tracing::debug!("client key accepted");
            Ok(())
        } else {
            tracing::warn!("request rejected: unknown client key");
            Err(GatewayError::InvalidApiKey)
        }
    }
}

impl std::fmt::Debug for KeyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValidator")
            .field("salt_present", &self.salt.is_some())
            .field("hashed_keys_count", &self.hashed_keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator_for(key: &str, salt: &str) -> KeyValidator {
        KeyValidator::new(
            Some(SecretString::from(salt.to_string())),
            [hash_client_key(key, salt)],
        )
    }

    #[test]
    fn test_known_key_is_accepted() {
        let validator = validator_for("client-secret", "pepper");
        assert!(validator.validate(Some("client-secret")).is_ok());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let validator = validator_for("client-secret", "pepper");
        let err = validator.validate(Some("other-secret")).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidApiKey));
    }

    #[test]
    fn test_missing_or_empty_key_is_rejected() {
        let validator = validator_for("client-secret", "pepper");
        assert!(matches!(
            validator.validate(None),
            Err(GatewayError::InvalidApiKey)
        ));
        assert!(matches!(
            validator.validate(Some("")),
            Err(GatewayError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_missing_salt_is_a_server_failure() {
        let validator = KeyValidator::new(None, [hash_client_key("k", "s")]);
        let err = validator.validate(Some("k")).unwrap_err();
        assert!(matches!(err, GatewayError::Misconfigured(_)));
    }

    #[test]
    fn test_missing_key_outranks_missing_salt() {
        // An unauthenticated caller sees 401 even when the salt is absent.
        let validator = KeyValidator::new(None, [] as [&str; 0]);
        assert!(matches!(
            validator.validate(None),
            Err(GatewayError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_salt_change_invalidates_key() {
        let digest = hash_client_key("client-secret", "pepper");
        let validator = KeyValidator::new(Some(SecretString::from("different".to_string())), [digest]);
        assert!(validator.validate(Some("client-secret")).is_err());
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let digest = hash_client_key("abc", "xyz");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
