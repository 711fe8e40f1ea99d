//! Gateway contract
//!
//! The capability surface a host consumes. No inheritance: hosts hold a
//! `dyn Gateway` and the adapter struct implements it.

use async_trait::async_trait;

use paygate_types::{Subscription, SubscriptionId};

use crate::error::GatewayError;
use crate::webhook::TransmissionHeaders;

/// One entry of the host-facing configuration field schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    /// Stable field key
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Whether the host must supply a value
    pub required: bool,
    /// Whether the value must be masked in host UIs
    pub secret: bool,
}

/// An inbound callback, disambiguated once at the boundary
///
/// The host's web layer decides which variant an inbound request is — a
/// correlation query parameter means a redirect return, a JSON body means
/// a webhook delivery — and the adapter never re-checks.
#[derive(Debug)]
pub enum CallbackRequest {
    /// The user came back from the processor's approval page
    RedirectReturn {
        /// Correlation id carried on the return URL
        subscription_id: SubscriptionId,
    },
    /// Asynchronous event delivery from the processor
    Webhook {
        /// Processor-supplied transmission headers
        headers: TransmissionHeaders,
        /// The event body as delivered
        event: serde_json::Value,
    },
}

/// What the host's web layer should answer with after a callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Send the user to this URL
    Redirect(String),
    /// Generic success acknowledgment, stops delivery retries
    Ack,
}

/// A successful subscribe: the created remote subscription and where the
/// user must go to approve recurring billing
#[derive(Debug, Clone)]
pub struct Approval {
    /// Processor-side subscription id
    pub remote_subscription_id: String,
    /// Approval URL to redirect the user to
    pub approve_url: String,
}

/// Recurring-payment gateway contract
#[async_trait]
pub trait Gateway: Send + Sync {
    /// The configuration fields this gateway needs from the host
    fn config_fields(&self) -> Vec<ConfigField>;

    /// Provision remote billing for a subscription and produce the
    /// user-facing approval redirect
    async fn subscribe(&self, subscription: &Subscription) -> Result<Approval, GatewayError>;

    /// Reconcile local state from an inbound callback
    async fn callback(&self, request: CallbackRequest) -> Result<CallbackOutcome, GatewayError>;

    /// Whether the remote subscription is currently active
    async fn check_subscription(&self, subscription: &Subscription) -> Result<bool, GatewayError>;

    /// Cancel the remote subscription; local state is the host's decision
    async fn cancel_subscription(&self, subscription: &Subscription) -> Result<bool, GatewayError>;
}
