//! Authenticated PayPal API client
//!
//! A single request helper used for every processor call. Deliberately
//! push-through: no retry, no backoff, no 4xx/5xx distinction. A failed
//! call surfaces once with its method, path and response body and the
//! host decides what to do with the inbound request that triggered it.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::PaypalConfig;
use crate::error::GatewayError;
use crate::token::TokenCache;

/// Authenticated request client for the PayPal REST API
pub struct PaypalClient {
    http: reqwest::Client,
    config: PaypalConfig,
    tokens: TokenCache,
}

impl PaypalClient {
    /// Create a new client for the given configuration
    pub fn new(config: PaypalConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens: TokenCache::new(),
        }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &PaypalConfig {
        &self.config
    }

    /// Current access token, fetched through the cache
    pub async fn access_token(&self) -> Result<String, GatewayError> {
        self.tokens.access_token(&self.http, &self.config).await
    }

    /// Make an authenticated call and decode the JSON response
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, GatewayError> {
        let text = self.call_raw(method.clone(), path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            error!(method = %method, path = %path, error = %e, "undecodable API response");
            GatewayError::remote(method.to_string(), path, format!("{e}; body={text}"))
        })
    }

    /// Make an authenticated call to an endpoint that answers with no body
    pub async fn call_no_content(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), GatewayError> {
        self.call_raw(method, path, body).await.map(|_| ())
    }

    async fn call_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String, GatewayError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.config.api_base(), path);
        debug!(method = %method, path = %path, "calling PayPal API");

        let mut request = self.http.request(method.clone(), &url).bearer_auth(token);
        if let Some(json) = body {
            request = request.json(json);
        }

        let response = request.send().await.map_err(|e| {
            error!(method = %method, path = %path, error = %e, "API request failed");
            GatewayError::remote(method.to_string(), path, e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(method = %method, path = %path, status = %status, body = %text, "API error");
            return Err(GatewayError::remote(method.to_string(), path, text));
        }

        Ok(text)
    }
}
