//! In-memory store doubles for integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use paygate_paypal::{
    Environment, PaypalConfig, PaypalGateway, SettingsStore, StoreResult, Subscription,
    SubscriptionId, SubscriptionStatus, SubscriptionStore,
};

/// In-memory subscription store with an activation call counter
#[derive(Default, Clone)]
pub struct MemorySubscriptionStore {
    subscriptions: Arc<DashMap<String, Subscription>>,
    activations: Arc<AtomicUsize>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test subscription directly
    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .insert(subscription.id.to_string(), subscription);
    }

    /// Read back a subscription outside the trait
    pub fn get(&self, id: &str) -> Option<Subscription> {
        self.subscriptions.get(id).map(|r| r.value().clone())
    }

    /// How many times `activate` ran
    pub fn activation_count(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn find(&self, id: &SubscriptionId) -> StoreResult<Option<Subscription>> {
        Ok(self.subscriptions.get(id.as_str()).map(|r| r.value().clone()))
    }

    async fn set_remote_subscription(
        &self,
        id: &SubscriptionId,
        remote_id: &str,
    ) -> StoreResult<()> {
        if let Some(mut subscription) = self.subscriptions.get_mut(id.as_str()) {
            subscription.remote_subscription_id = Some(remote_id.to_string());
        }
        Ok(())
    }

    async fn activate(
        &self,
        id: &SubscriptionId,
        remote_id: &str,
        _payload: &serde_json::Value,
    ) -> StoreResult<()> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        if let Some(mut subscription) = self.subscriptions.get_mut(id.as_str()) {
            subscription.remote_subscription_id = Some(remote_id.to_string());
            subscription.status = SubscriptionStatus::Active;
        }
        Ok(())
    }
}

/// In-memory settings record
#[derive(Default, Clone)]
pub struct MemorySettings {
    values: Arc<DashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a settings key before the test runs
    #[allow(dead_code)]
    pub fn preset(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Read back a settings key outside the trait
    #[allow(dead_code)]
    pub fn stored(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|r| r.value().clone())
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).map(|r| r.value().clone()))
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A pending 30-day test subscription
pub fn test_subscription(id: &str) -> Subscription {
    Subscription {
        id: SubscriptionId::new(id),
        name: "Pro Plan".to_string(),
        amount: "9.99".to_string(),
        currency: "USD".to_string(),
        frequency_days: 30,
        status: SubscriptionStatus::Pending,
        remote_subscription_id: None,
        remote_plan_id: None,
        return_url: "https://host.example/gateway/pp-1/return".to_string(),
        cancel_url: "https://host.example/gateway/pp-1/cancel".to_string(),
        success_url: "https://host.example/billing/success".to_string(),
    }
}

/// Sandbox config pointed at a mock server
pub fn test_config(server_uri: &str) -> PaypalConfig {
    PaypalConfig::new(Environment::Sandbox, "test-client-id", "test-client-secret")
        .with_api_base(format!("{server_uri}/v1"))
}

/// Gateway wired to a mock server and the given stores
#[allow(dead_code)]
pub fn test_gateway(
    server_uri: &str,
    subscriptions: &MemorySubscriptionStore,
    settings: &MemorySettings,
) -> PaypalGateway {
    PaypalGateway::new(
        test_config(server_uri),
        Arc::new(subscriptions.clone()),
        Arc::new(settings.clone()),
        "https://host.example/gateway/pp-1/callback",
    )
}
