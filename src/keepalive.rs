//! Keep-alive self-ping loop
//!
//! Free-tier hosts suspend services that receive no traffic for a while. A
//! periodic GET against our own root endpoint keeps the process awake. The
//! loop only starts when an externally-reachable URL is configured, runs on
//! its own task for the process lifetime, and treats ping failures as
//! log-and-continue.

use std::time::Duration;

use crate::config::GatewayConfig;

/// Upper bound on a single self-ping round trip
const PING_TIMEOUT: Duration = Duration::from_secs(30);

/// Spawn the self-ping loop if an external URL is configured.
///
/// Returns `None` when the loop is disabled.
pub fn spawn(config: &GatewayConfig) -> Option<tokio::task::JoinHandle<()>> {
    let url = config.external_url.clone()?;
    Some(spawn_with(url, config.keep_alive_interval))
}

/// Spawn the loop against an explicit target and period
pub fn spawn_with(base_url: String, period: Duration) -> tokio::task::JoinHandle<()> {
    let target = format!("{}/", base_url.trim_end_matches('/'));
    tokio::spawn(async move {
        // Each ping is bounded so a hung connection cannot stall later
        // ticks; the bound never exceeds the period.
        let client = match reqwest::Client::builder()
            .timeout(PING_TIMEOUT.min(period))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "keep-alive disabled: failed to create HTTP client");
                return;
            }
        };
        let mut interval = tokio::time::interval(period);
        // The first tick of a tokio interval completes immediately; skip it
        // so pings start one period after boot.
        interval.tick().await;

        tracing::info!(url = %target, period_secs = period.as_secs(), "keep-alive loop started");
        loop {
            interval.tick().await;
            match client.get(&target).send().await {
                Ok(response) => {
                    tracing::debug!(status = %response.status(), "keep-alive ping");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "keep-alive ping failed");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_without_external_url() {
        assert!(spawn(&GatewayConfig::default()).is_none());
    }

    #[tokio::test]
    async fn test_running_with_external_url() {
        let config = GatewayConfig::default()
            .with_external_url("http://127.0.0.1:9")
            .with_keep_alive_interval(Duration::from_millis(10));
        let handle = spawn(&config).expect("loop should start");
        handle.abort();
    }
}
