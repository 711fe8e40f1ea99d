//! Gateway errors

use paygate_types::StoreError;
use thiserror::Error;

/// Errors surfaced by the PayPal gateway adapter
///
/// Every failure is terminal inside the adapter: nothing is retried, the
/// host's web layer decides how to answer the inbound request.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Access token could not be obtained
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A remote API call returned a non-success status
    #[error("{method} {path} failed: {body}")]
    RemoteRequest {
        /// HTTP method of the failed call
        method: String,
        /// API path of the failed call
        path: String,
        /// Response body, preserved verbatim
        body: String,
    },

    /// Plan or subscription creation violated an expected-shape invariant
    #[error("provisioning failed: {0}")]
    Provisioning(String),

    /// Webhook signature verification failed
    #[error("webhook verification failed: {0}")]
    Verification(String),

    /// Inbound webhook payload was malformed
    #[error("bad webhook payload: {0}")]
    BadPayload(String),

    /// Correlation id does not resolve to a known local subscription
    #[error("subscription not found: {0}")]
    NotFound(String),

    /// Host persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GatewayError {
    /// Build a remote-request error, preserving method, path and body
    pub fn remote(method: impl Into<String>, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::RemoteRequest {
            method: method.into(),
            path: path.into(),
            body: body.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error came back from the processor's API
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteRequest { .. } | Self::Authentication(_))
    }
}
