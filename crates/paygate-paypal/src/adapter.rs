//! PayPal gateway adapter
//!
//! Orchestrates the lifecycle protocol: subscribe provisioning, the two
//! callback reconciliation paths, and the status operations. Every
//! operation runs to completion inside one inbound host request; nothing
//! here retries or schedules background work.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use paygate_types::{SettingsStore, Subscription, SubscriptionId, SubscriptionStore};

use crate::client::PaypalClient;
use crate::config::PaypalConfig;
use crate::error::GatewayError;
use crate::gateway::{Approval, CallbackOutcome, CallbackRequest, ConfigField, Gateway};
use crate::plan::resolve_plan;
use crate::webhook::{ensure_webhook, verify_signature, EventType, TransmissionHeaders};

/// Remote status value that counts as active
const ACTIVE_STATUS: &str = "ACTIVE";

/// Reason string sent with cancel requests
const CANCEL_REASON: &str = "Canceled at the subscriber's request";

#[derive(Debug, Deserialize)]
struct LinkDescription {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSubscription {
    id: String,
    links: Option<Vec<LinkDescription>>,
}

/// PayPal subscriptions gateway
///
/// Holds the API client, the two host-owned stores, and the callback URL
/// the host routes processor traffic to.
pub struct PaypalGateway {
    client: PaypalClient,
    subscriptions: Arc<dyn SubscriptionStore>,
    settings: Arc<dyn SettingsStore>,
    callback_url: String,
}

impl PaypalGateway {
    /// Create a new gateway adapter
    ///
    /// `callback_url` is the host endpoint that receives both redirect
    /// returns and webhook deliveries; it should carry the host's gateway
    /// identifier so deliveries correlate back to this configuration.
    pub fn new(
        config: PaypalConfig,
        subscriptions: Arc<dyn SubscriptionStore>,
        settings: Arc<dyn SettingsStore>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            client: PaypalClient::new(config),
            subscriptions,
            settings,
            callback_url: callback_url.into(),
        }
    }

    async fn handle_redirect_return(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<CallbackOutcome, GatewayError> {
        let subscription = self
            .subscriptions
            .find(subscription_id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(subscription_id.to_string()))?;

        let remote_id = subscription.remote_subscription_id.clone().ok_or_else(|| {
            GatewayError::Provisioning(format!(
                "subscription {subscription_id} has no remote subscription id"
            ))
        })?;

        let details: serde_json::Value = self
            .client
            .call(Method::GET, &format!("/billing/subscriptions/{remote_id}"), None)
            .await?;
        let status = details.get("status").and_then(serde_json::Value::as_str);

        if status == Some(ACTIVE_STATUS) {
            self.subscriptions
                .activate(&subscription.id, &remote_id, &details)
                .await?;
            info!(subscription = %subscription.id, remote_id = %remote_id, "activated on redirect return");
            Ok(CallbackOutcome::Redirect(subscription.success_url))
        } else {
            // approval not confirmed yet; the webhook path finishes this
            debug!(subscription = %subscription.id, status = ?status, "remote not active, no action");
            Ok(CallbackOutcome::Ack)
        }
    }

    async fn handle_webhook(
        &self,
        headers: TransmissionHeaders,
        event: serde_json::Value,
    ) -> Result<CallbackOutcome, GatewayError> {
        let event_type = event
            .get("event_type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GatewayError::BadPayload("missing event_type".into()))?
            .to_string();

        // authenticity comes before any state mutation
        let webhook_id =
            ensure_webhook(&self.client, self.settings.as_ref(), &self.callback_url).await?;
        verify_signature(&self.client, &webhook_id, &headers, &event).await?;

        match EventType::from(event_type.as_str()) {
            kind @ (EventType::Activated | EventType::Cancelled | EventType::Expired) => {
                let resource = event
                    .get("resource")
                    .ok_or_else(|| GatewayError::BadPayload("missing resource".into()))?;
                let custom_id = resource
                    .get("custom_id")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| GatewayError::BadPayload("resource missing custom_id".into()))?;
                let remote_id = resource
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| GatewayError::BadPayload("resource missing id".into()))?;

                if kind == EventType::Activated {
                    self.activate_from_event(custom_id, remote_id, &event).await?;
                } else {
                    // cancellation/expiry policy belongs to the host
                    debug!(event_type = %event_type, custom_id = %custom_id, "acknowledged without local action");
                }
            }
            other => {
                debug!(event_type = %event_type, kind = ?other, "unhandled event type");
            }
        }

        Ok(CallbackOutcome::Ack)
    }

    async fn activate_from_event(
        &self,
        custom_id: &str,
        remote_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), GatewayError> {
        let id = SubscriptionId::from(custom_id);
        let subscription = self
            .subscriptions
            .find(&id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(custom_id.to_string()))?;

        // deliveries can repeat; activate at most once
        if subscription.is_active() {
            debug!(subscription = %id, "already active, duplicate delivery ignored");
            return Ok(());
        }

        self.subscriptions.activate(&id, remote_id, event).await?;
        info!(subscription = %id, remote_id = %remote_id, "activated from webhook");
        Ok(())
    }

    fn remote_id_of<'a>(subscription: &'a Subscription) -> Result<&'a str, GatewayError> {
        subscription.remote_subscription_id.as_deref().ok_or_else(|| {
            GatewayError::Provisioning(format!(
                "subscription {} has no remote subscription id",
                subscription.id
            ))
        })
    }
}

#[async_trait]
impl Gateway for PaypalGateway {
    fn config_fields(&self) -> Vec<ConfigField> {
        vec![
            ConfigField {
                key: "mode",
                label: "Mode",
                required: true,
                secret: false,
            },
            ConfigField {
                key: "client_id",
                label: "Client ID",
                required: true,
                secret: false,
            },
            ConfigField {
                key: "client_secret",
                label: "Client Secret",
                required: true,
                secret: true,
            },
        ]
    }

    #[instrument(skip(self, subscription), fields(subscription = %subscription.id))]
    async fn subscribe(&self, subscription: &Subscription) -> Result<Approval, GatewayError> {
        ensure_webhook(&self.client, self.settings.as_ref(), &self.callback_url).await?;

        let plan_id = resolve_plan(&self.client, subscription).await?;
        debug!(plan_id = %plan_id, "creating remote subscription");

        let body = serde_json::json!({
            "plan_id": plan_id,
            "custom_id": subscription.id,
            "application_context": {
                "return_url": subscription.return_url,
                "cancel_url": subscription.cancel_url,
            },
        });
        let created: CreatedSubscription = self
            .client
            .call(Method::POST, "/billing/subscriptions", Some(&body))
            .await?;

        // recorded before the approval link is evaluated, so the remote id
        // is usable for status checks even if approval never completes
        self.subscriptions
            .set_remote_subscription(&subscription.id, &created.id)
            .await?;

        let links = created.links.ok_or_else(|| {
            GatewayError::Provisioning("subscription response carried no links".into())
        })?;
        let approve = links.into_iter().find(|link| link.rel == "approve").ok_or_else(|| {
            GatewayError::Provisioning("no approve link in subscription response".into())
        })?;

        info!(remote_id = %created.id, "created remote subscription");
        Ok(Approval {
            remote_subscription_id: created.id,
            approve_url: approve.href,
        })
    }

    async fn callback(&self, request: CallbackRequest) -> Result<CallbackOutcome, GatewayError> {
        match request {
            CallbackRequest::RedirectReturn { subscription_id } => {
                self.handle_redirect_return(&subscription_id).await
            }
            CallbackRequest::Webhook { headers, event } => {
                self.handle_webhook(headers, event).await
            }
        }
    }

    #[instrument(skip(self, subscription), fields(subscription = %subscription.id))]
    async fn check_subscription(&self, subscription: &Subscription) -> Result<bool, GatewayError> {
        let remote_id = Self::remote_id_of(subscription)?;
        let path = format!("/billing/subscriptions/{remote_id}");

        let details: serde_json::Value = self.client.call(Method::GET, &path, None).await?;
        let status = details
            .get("status")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GatewayError::remote("GET", path.clone(), "response missing status"))?;

        Ok(status == ACTIVE_STATUS)
    }

    #[instrument(skip(self, subscription), fields(subscription = %subscription.id))]
    async fn cancel_subscription(&self, subscription: &Subscription) -> Result<bool, GatewayError> {
        let remote_id = Self::remote_id_of(subscription)?;
        let body = serde_json::json!({ "reason": CANCEL_REASON });

        self.client
            .call_no_content(
                Method::POST,
                &format!("/billing/subscriptions/{remote_id}/cancel"),
                Some(&body),
            )
            .await?;

        info!(remote_id = %remote_id, "canceled remote subscription");
        Ok(true)
    }
}
