//! Paygate PayPal - PayPal subscriptions gateway adapter
//!
//! Delegates recurring-payment lifecycle management to the PayPal REST
//! API: plan provisioning, subscription creation with a user-facing
//! approval redirect, and state reconciliation through redirect-return
//! and webhook callbacks.
//!
//! # Example
//!
//! ```rust,ignore
//! use paygate_paypal::{Environment, Gateway, PaypalConfig, PaypalGateway};
//!
//! let config = PaypalConfig::new(Environment::Sandbox, "client-id", "client-secret");
//! let gateway = PaypalGateway::new(
//!     config,
//!     subscriptions, // Arc<dyn SubscriptionStore>
//!     settings,      // Arc<dyn SettingsStore>
//!     "https://host.example/gateway/paypal/callback",
//! );
//!
//! // Provision remote billing; send the user to approval.approve_url
//! let approval = gateway.subscribe(&subscription).await?;
//! ```

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod plan;
pub mod token;
pub mod webhook;

pub use adapter::PaypalGateway;
pub use client::PaypalClient;
pub use config::{Environment, PaypalConfig};
pub use error::GatewayError;
pub use gateway::{Approval, CallbackOutcome, CallbackRequest, ConfigField, Gateway};
pub use plan::{optimal_interval, BillingInterval, IntervalUnit};
pub use token::TokenCache;
pub use webhook::{ensure_webhook, EventType, TransmissionHeaders, SUBSCRIBED_EVENTS};

// Re-export the host-facing contracts for convenience
pub use paygate_types::{
    SettingsStore, StoreError, StoreResult, Subscription, SubscriptionId, SubscriptionStatus,
    SubscriptionStore,
};
