//! Access-token cache
//!
//! Wraps the OAuth2 client-credentials grant in a short-TTL cache so that
//! the burst of API calls inside a single lifecycle operation shares one
//! token fetch. The TTL is fixed and deliberately far below PayPal's real
//! token lifetime.

use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::PaypalConfig;
use crate::error::GatewayError;

/// Fixed key for the single token entry
const TOKEN_CACHE_KEY: &str = "paypal.access_token";

/// How long a fetched token is served from cache
const TOKEN_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Adapter-scoped token cache
///
/// Concurrent callers inside the TTL window receive the cached value.
/// Races across the expiry edge are tolerated; the worst case is one
/// redundant fetch. Failures are never cached and propagate immediately.
pub struct TokenCache {
    tokens: Cache<&'static str, String>,
}

impl TokenCache {
    /// Create a new token cache with the fixed TTL
    pub fn new() -> Self {
        let tokens = Cache::builder()
            .max_capacity(1)
            .time_to_live(TOKEN_TTL)
            .build();
        Self { tokens }
    }

    /// Get the current access token, fetching a fresh one on expiry
    pub async fn access_token(
        &self,
        http: &reqwest::Client,
        config: &PaypalConfig,
    ) -> Result<String, GatewayError> {
        if let Some(token) = self.tokens.get(TOKEN_CACHE_KEY).await {
            tracing::trace!("access token cache hit");
            return Ok(token);
        }

        let token = fetch_access_token(http, config).await?;
        self.tokens.insert(TOKEN_CACHE_KEY, token.clone()).await;
        Ok(token)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the client-credentials grant against the OAuth endpoint
async fn fetch_access_token(
    http: &reqwest::Client,
    config: &PaypalConfig,
) -> Result<String, GatewayError> {
    let url = format!("{}/oauth2/token", config.api_base());
    debug!("fetching access token");

    let response = http
        .post(&url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "token request failed");
            GatewayError::Authentication(e.to_string())
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::Authentication(e.to_string()))?;

    if !status.is_success() {
        error!(status = %status, "token endpoint rejected credentials");
        return Err(GatewayError::Authentication(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| GatewayError::Authentication(format!("{e}; body={body}")))?;

    parsed
        .access_token
        .ok_or_else(|| GatewayError::Authentication("token response missing access_token".into()))
}
