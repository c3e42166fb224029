//! # Square API Types
//!
//! Request and response bodies for the handful of Square endpoints the
//! proxy calls. Response envelopes keep every field optional; deciding
//! success is the client's job.

use pay_core::{
    CatalogObject, ChargeRequest, CreatedPaymentLink, Money, Payment, PaymentLinkRecord,
    ProviderErrorDetail, QuickPayRequest,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Requests
// =============================================================================

/// `POST /payments`
#[derive(Debug, Serialize)]
pub struct CreatePaymentBody<'a> {
    pub idempotency_key: &'a str,
    pub source_id: &'a str,
    pub amount_money: Money,
    pub location_id: &'a str,
    pub note: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email_address: Option<&'a str>,
}

impl<'a> CreatePaymentBody<'a> {
    pub fn new(charge: &'a ChargeRequest, location_id: &'a str) -> Self {
        Self {
            idempotency_key: charge.idempotency_key.as_str(),
            source_id: &charge.source_id,
            amount_money: charge.amount,
            location_id,
            note: &charge.note,
            buyer_email_address: charge.buyer_email.as_deref(),
        }
    }
}

/// `POST /online-checkout/payment-links`
#[derive(Debug, Serialize)]
pub struct CreatePaymentLinkBody<'a> {
    pub idempotency_key: &'a str,
    pub quick_pay: QuickPay<'a>,
    pub checkout_options: CheckoutOptions<'a>,
}

#[derive(Debug, Serialize)]
pub struct QuickPay<'a> {
    pub name: &'a str,
    pub price_money: Money,
    pub location_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CheckoutOptions<'a> {
    pub redirect_url: &'a str,
}

impl<'a> CreatePaymentLinkBody<'a> {
    pub fn new(request: &'a QuickPayRequest, location_id: &'a str) -> Self {
        Self {
            idempotency_key: request.idempotency_key.as_str(),
            quick_pay: QuickPay {
                name: &request.name,
                price_money: request.price,
                location_id,
            },
            checkout_options: CheckoutOptions {
                redirect_url: &request.redirect_url,
            },
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Decode a resource field, treating an unusable object as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

#[derive(Debug, Deserialize)]
pub struct PaymentEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub payment: Option<Payment>,
    #[serde(default)]
    pub errors: Vec<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogListEnvelope {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    #[serde(default)]
    pub errors: Vec<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentLinkEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub payment_link: Option<CreatedPaymentLink>,
    #[serde(default)]
    pub errors: Vec<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentLinkListEnvelope {
    #[serde(default)]
    pub payment_links: Vec<PaymentLinkRecord>,
    #[serde(default)]
    pub errors: Vec<ProviderErrorDetail>,
}
