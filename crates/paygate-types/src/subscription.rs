//! Subscription types

use serde::{Deserialize, Serialize};

/// Host-side subscription identifier
///
/// This is the correlation id embedded in the remote subscription's
/// `custom_id`, used to map processor events back to local records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    /// Create a new subscription ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created locally, not yet confirmed by the processor
    Pending,
    /// Recurring billing is active
    Active,
    /// Subscription was canceled
    Canceled,
    /// Subscription expired
    Expired,
}

/// Host-owned subscription record
///
/// The adapter receives this as a read-only view; mutations go through
/// [`crate::SubscriptionStore`] so the host keeps ownership of persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription ID (the correlation id)
    pub id: SubscriptionId,
    /// Display name, used for remote product/plan naming
    pub name: String,
    /// Price per billing cycle as a decimal string (e.g. `"9.99"`)
    pub amount: String,
    /// ISO currency code (e.g. `"USD"`)
    pub currency: String,
    /// Billing frequency in days
    pub frequency_days: u32,
    /// Current lifecycle status
    pub status: SubscriptionStatus,
    /// Processor-side subscription id, set once remote creation succeeds
    pub remote_subscription_id: Option<String>,
    /// Pre-supplied processor-side plan id; when present the adapter skips
    /// product/plan provisioning entirely
    pub remote_plan_id: Option<String>,
    /// Where the processor sends the user back after approval
    pub return_url: String,
    /// Where the processor sends the user if they abort approval
    pub cancel_url: String,
    /// Where the adapter sends the user once activation is confirmed
    pub success_url: String,
}

impl Subscription {
    /// Whether recurring billing is currently active
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_id_display() {
        let id = SubscriptionId::new("sub-42");
        assert_eq!(id.to_string(), "sub-42");
        assert_eq!(id.as_str(), "sub-42");
    }

    #[test]
    fn test_status_serde_shape() {
        let json = serde_json::to_string(&SubscriptionStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");

        let status: SubscriptionStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Canceled);
    }

    #[test]
    fn test_is_active() {
        let sub = Subscription {
            id: SubscriptionId::new("s1"),
            name: "Pro".to_string(),
            amount: "9.99".to_string(),
            currency: "USD".to_string(),
            frequency_days: 30,
            status: SubscriptionStatus::Pending,
            remote_subscription_id: None,
            remote_plan_id: None,
            return_url: "https://host.example/return".to_string(),
            cancel_url: "https://host.example/cancel".to_string(),
            success_url: "https://host.example/success".to_string(),
        };
        assert!(!sub.is_active());

        let active = Subscription {
            status: SubscriptionStatus::Active,
            ..sub
        };
        assert!(active.is_active());
    }
}
