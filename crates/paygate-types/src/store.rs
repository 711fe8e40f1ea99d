//! Host persistence contracts
//!
//! The adapter owns no storage. The host implements these traits over
//! whatever persistence it already has; the adapter calls them at exactly
//! the points the lifecycle protocol requires.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Subscription, SubscriptionId};

/// Error returned by host store implementations
#[derive(Error, Debug)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    /// Create a new store error
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Host-implemented subscription persistence
///
/// The adapter mutates a subscription exactly twice over its lifecycle:
/// once to record the processor-side id after remote creation, once to
/// activate it when the processor confirms. It never deletes.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Look up a subscription by its id (the correlation id)
    async fn find(&self, id: &SubscriptionId) -> StoreResult<Option<Subscription>>;

    /// Record the processor-side subscription id
    async fn set_remote_subscription(
        &self,
        id: &SubscriptionId,
        remote_id: &str,
    ) -> StoreResult<()>;

    /// Transition the subscription to active, recording the processor-side
    /// id and the raw payload that confirmed activation
    async fn activate(
        &self,
        id: &SubscriptionId,
        remote_id: &str,
        payload: &serde_json::Value,
    ) -> StoreResult<()>;
}

/// Host-owned gateway settings record
///
/// Keyed read/write with write-through persistence: a successful `put` is
/// durable when it returns. The adapter writes two keys, one webhook
/// identifier per environment, and never overwrites a present value.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a settings value
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a settings value durably
    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;
}
