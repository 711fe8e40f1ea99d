//! Product and billing-plan provisioning
//!
//! A remote billing plan is provisioned in two steps: a catalog product
//! named after the subscription, then a plan with a single infinitely
//! recurring billing cycle at the subscription's price and currency.

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument};

use paygate_types::Subscription;

use crate::client::PaypalClient;
use crate::error::GatewayError;

/// Catalog product type sent on product creation
const PRODUCT_TYPE: &str = "DIGITAL";

/// Catalog product category sent on product creation
const PRODUCT_CATEGORY: &str = "SOFTWARE";

/// How many failed payments PayPal tolerates before suspending
const PAYMENT_FAILURE_THRESHOLD: u32 = 3;

/// Billing interval unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    /// Daily cycle
    Day,
    /// Weekly cycle
    Week,
    /// Monthly cycle
    Month,
    /// Yearly cycle
    Year,
}

impl IntervalUnit {
    /// The wire name PayPal expects for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
        }
    }
}

impl std::fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized billing interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingInterval {
    /// Number of units per cycle
    pub count: u32,
    /// Interval unit
    pub unit: IntervalUnit,
}

/// Divisors tested in strictly descending order; the first exact divisor
/// wins.
const DIVISORS: [(u32, IntervalUnit); 4] = [
    (365, IntervalUnit::Year),
    (30, IntervalUnit::Month),
    (7, IntervalUnit::Week),
    (1, IntervalUnit::Day),
];

/// Normalize a frequency in days to the coarsest exact billing interval
///
/// `90` days becomes 3 months and `14` days becomes 2 weeks, but a day
/// count with no exact coarser divisor degrades all the way to daily
/// granularity: `400` days becomes 400 one-day cycles. Callers with large
/// non-round frequencies should expect that.
pub fn optimal_interval(days: u32) -> Result<BillingInterval, GatewayError> {
    if days == 0 {
        return Err(GatewayError::Provisioning(
            "billing frequency must be at least one day".into(),
        ));
    }
    for (divisor, unit) in DIVISORS {
        if days % divisor == 0 {
            return Ok(BillingInterval {
                count: days / divisor,
                unit,
            });
        }
    }
    // days % 1 == 0 for every positive day count, so the loop always returns
    Err(GatewayError::Provisioning(format!(
        "no billing interval for {days} days"
    )))
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

/// Create a catalog product for the subscription
#[instrument(skip(client, subscription), fields(subscription = %subscription.id))]
pub(crate) async fn create_product(
    client: &PaypalClient,
    subscription: &Subscription,
) -> Result<String, GatewayError> {
    debug!(name = %subscription.name, "creating catalog product");

    let body = serde_json::json!({
        "name": subscription.name,
        "type": PRODUCT_TYPE,
        "category": PRODUCT_CATEGORY,
    });

    let product: CreatedResource = client
        .call(Method::POST, "/catalogs/products", Some(&body))
        .await?;

    Ok(product.id)
}

/// Create a billing plan matching the subscription's price and frequency
///
/// Provisions the product first, then a plan with one `REGULAR` cycle that
/// recurs forever, auto-bills outstanding payments and suspends after
/// three failures.
#[instrument(skip(client, subscription), fields(subscription = %subscription.id))]
pub(crate) async fn create_plan(
    client: &PaypalClient,
    subscription: &Subscription,
) -> Result<String, GatewayError> {
    let product_id = create_product(client, subscription).await?;
    let interval = optimal_interval(subscription.frequency_days)?;
    debug!(product_id = %product_id, interval = ?interval, "creating billing plan");

    let body = serde_json::json!({
        "product_id": product_id,
        "name": subscription.name,
        "billing_cycles": [{
            "sequence": 1,
            "tenure_type": "REGULAR",
            "total_cycles": 0,
            "frequency": {
                "interval_unit": interval.unit.as_str(),
                "interval_count": interval.count,
            },
            "pricing_scheme": {
                "fixed_price": {
                    "value": subscription.amount,
                    "currency_code": subscription.currency,
                },
            },
        }],
        "payment_preferences": {
            "auto_bill_outstanding": true,
            "payment_failure_threshold": PAYMENT_FAILURE_THRESHOLD,
        },
    });

    let plan: CreatedResource = client.call(Method::POST, "/billing/plans", Some(&body)).await?;

    Ok(plan.id)
}

/// Resolve the plan id to bind the remote subscription to
///
/// A pre-supplied plan id on the subscription short-circuits provisioning
/// entirely; otherwise a fresh product and plan are created.
pub(crate) async fn resolve_plan(
    client: &PaypalClient,
    subscription: &Subscription,
) -> Result<String, GatewayError> {
    let plan_id = match &subscription.remote_plan_id {
        Some(existing) if !existing.is_empty() => existing.clone(),
        _ => create_plan(client, subscription).await?,
    };

    if plan_id.is_empty() {
        return Err(GatewayError::Provisioning(
            "no billing plan id resolved".into(),
        ));
    }

    Ok(plan_id)
}
