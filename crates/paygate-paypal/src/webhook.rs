//! Webhook registration, event types and signature verification

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use paygate_types::SettingsStore;

use crate::client::PaypalClient;
use crate::error::GatewayError;

/// Transmission header: signing algorithm
pub const HEADER_AUTH_ALGO: &str = "PAYPAL-AUTH-ALGO";
/// Transmission header: signing certificate URL
pub const HEADER_CERT_URL: &str = "PAYPAL-CERT-URL";
/// Transmission header: delivery id
pub const HEADER_TRANSMISSION_ID: &str = "PAYPAL-TRANSMISSION-ID";
/// Transmission header: delivery signature
pub const HEADER_TRANSMISSION_SIG: &str = "PAYPAL-TRANSMISSION-SIG";
/// Transmission header: delivery timestamp
pub const HEADER_TRANSMISSION_TIME: &str = "PAYPAL-TRANSMISSION-TIME";

/// Event set every registered webhook subscribes to
pub const SUBSCRIBED_EVENTS: [&str; 6] = [
    "BILLING.SUBSCRIPTION.ACTIVATED",
    "BILLING.SUBSCRIPTION.CANCELLED",
    "BILLING.SUBSCRIPTION.EXPIRED",
    "BILLING.SUBSCRIPTION.RE-ACTIVATED",
    "BILLING.SUBSCRIPTION.SUSPENDED",
    "PAYMENT.SALE.COMPLETED",
];

/// Webhook event types we receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    /// Subscriber approved and billing started
    Activated,
    /// Subscription was cancelled
    Cancelled,
    /// Subscription ran out
    Expired,
    /// Suspended subscription resumed
    Reactivated,
    /// Subscription suspended after payment failures
    Suspended,
    /// A recurring payment cleared
    SaleCompleted,
    /// Anything else the processor sends
    Unknown(String),
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "BILLING.SUBSCRIPTION.ACTIVATED" => Self::Activated,
            "BILLING.SUBSCRIPTION.CANCELLED" => Self::Cancelled,
            "BILLING.SUBSCRIPTION.EXPIRED" => Self::Expired,
            "BILLING.SUBSCRIPTION.RE-ACTIVATED" => Self::Reactivated,
            "BILLING.SUBSCRIPTION.SUSPENDED" => Self::Suspended,
            "PAYMENT.SALE.COMPLETED" => Self::SaleCompleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// The five processor-supplied transmission headers of a webhook delivery
///
/// The host's web layer copies these off the inbound request; the adapter
/// posts them back to the processor for verification.
#[derive(Debug, Clone)]
pub struct TransmissionHeaders {
    /// `PAYPAL-AUTH-ALGO`
    pub auth_algo: String,
    /// `PAYPAL-CERT-URL`
    pub cert_url: String,
    /// `PAYPAL-TRANSMISSION-ID`
    pub transmission_id: String,
    /// `PAYPAL-TRANSMISSION-SIG`
    pub transmission_sig: String,
    /// `PAYPAL-TRANSMISSION-TIME`
    pub transmission_time: String,
}

#[derive(Debug, Deserialize)]
struct RegisteredWebhook {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    verification_status: Option<String>,
}

/// Ensure exactly one webhook subscription exists for this environment
///
/// The stored identifier is authoritative: when the settings record holds
/// one, it is returned with no network call. Otherwise a webhook is
/// registered for the fixed event set and its id persisted write-through
/// before returning. There is no de-duplication against remotely existing
/// webhooks; if the settings record is lost, the next call registers a
/// duplicate.
#[instrument(skip(client, settings, callback_url))]
pub async fn ensure_webhook(
    client: &PaypalClient,
    settings: &dyn SettingsStore,
    callback_url: &str,
) -> Result<String, GatewayError> {
    let key = client.config().environment.webhook_id_key();

    if let Some(existing) = settings.get(key).await? {
        if !existing.is_empty() {
            tracing::trace!(webhook_id = %existing, "reusing stored webhook id");
            return Ok(existing);
        }
    }

    debug!(callback_url = %callback_url, "registering webhook");
    let event_types: Vec<serde_json::Value> = SUBSCRIBED_EVENTS
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    let body = serde_json::json!({
        "url": callback_url,
        "event_types": event_types,
    });

    let webhook: RegisteredWebhook = client
        .call(Method::POST, "/notifications/webhooks", Some(&body))
        .await?;

    settings.put(key, &webhook.id).await?;
    info!(webhook_id = %webhook.id, key = %key, "registered webhook");

    Ok(webhook.id)
}

/// Verify the authenticity of a webhook delivery
///
/// Posts the transmission headers, the webhook id and the event body to
/// the processor's verification endpoint. Anything but a
/// `verification_status` of `SUCCESS` fails, including transport errors.
/// Callers must not touch local state before this returns `Ok`.
#[instrument(skip_all)]
pub(crate) async fn verify_signature(
    client: &PaypalClient,
    webhook_id: &str,
    headers: &TransmissionHeaders,
    event: &serde_json::Value,
) -> Result<(), GatewayError> {
    let body = serde_json::json!({
        "auth_algo": headers.auth_algo,
        "cert_url": headers.cert_url,
        "transmission_id": headers.transmission_id,
        "transmission_sig": headers.transmission_sig,
        "transmission_time": headers.transmission_time,
        "webhook_id": webhook_id,
        "webhook_event": event,
    });

    let verdict: VerificationResponse = client
        .call(Method::POST, "/notifications/verify-webhook-signature", Some(&body))
        .await
        .map_err(|e| GatewayError::Verification(e.to_string()))?;

    match verdict.verification_status.as_deref() {
        Some("SUCCESS") => Ok(()),
        other => {
            warn!(verification_status = ?other, "webhook signature rejected");
            Err(GatewayError::Verification(format!(
                "verification_status was {other:?}"
            )))
        }
    }
}
