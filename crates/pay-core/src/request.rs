//! # Incoming Requests
//!
//! Browser-facing request bodies and their validation.
//! Fields are kept as raw JSON so that a wrong type ends up as a
//! validation message instead of a deserialization failure.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{is_truthy, positive_integer, Money};
use crate::provider::{ChargeRequest, IdempotencyKey, QuickPayRequest};
use serde::Deserialize;
use serde_json::Value;

pub const MISSING_PAYMENT_FIELDS: &str = "Missing required fields: sourceId and amount";
pub const INVALID_AMOUNT: &str = "Invalid amount";
pub const MISSING_CHECKOUT_FIELDS: &str = "Missing required fields: name and price";
pub const INVALID_PRICE: &str = "Invalid price";

/// Label used in the payment note when neither title nor item is given
const DEFAULT_NOTE_LABEL: &str = "Purchase";

/// `POST /create-payment` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestBody {
    /// Card or wallet token from the browser payment form
    #[serde(default)]
    pub source_id: Option<Value>,
    /// Amount in cents
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub item: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    /// Receipt email
    #[serde(default)]
    pub email: Option<Value>,
}

impl PaymentRequestBody {
    /// Validate and turn into an outbound charge with a fresh idempotency key.
    pub fn validate(&self, note_prefix: &str) -> PaymentResult<ChargeRequest> {
        let source_id = non_empty_str(self.source_id.as_ref());
        let amount = self.amount.as_ref().filter(|v| is_truthy(v));

        let (Some(source_id), Some(amount)) = (source_id, amount) else {
            return Err(PaymentError::InvalidRequest(MISSING_PAYMENT_FIELDS.to_string()));
        };

        let cents = positive_integer(amount)
            .ok_or_else(|| PaymentError::InvalidRequest(INVALID_AMOUNT.to_string()))?;

        let label = non_empty_str(self.title.as_ref())
            .or_else(|| non_empty_str(self.item.as_ref()))
            .unwrap_or(DEFAULT_NOTE_LABEL);

        Ok(ChargeRequest {
            idempotency_key: IdempotencyKey::fresh(),
            source_id: source_id.to_string(),
            amount: Money::usd(cents),
            note: format!("{}: {}", note_prefix, label),
            buyer_email: non_empty_str(self.email.as_ref()).map(str::to_string),
        })
    }
}

/// `POST /checkout` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequestBody {
    #[serde(default)]
    pub name: Option<Value>,
    /// Price in cents
    #[serde(default)]
    pub price: Option<Value>,
    /// Where the hosted checkout sends the buyer afterwards
    #[serde(default)]
    pub redirect_url: Option<Value>,
}

impl CheckoutRequestBody {
    /// Validate and turn into a quick-pay link request with a fresh idempotency key.
    ///
    /// A price of `0` is present but invalid, so it reports "Invalid price".
    pub fn validate(&self, default_redirect_url: &str) -> PaymentResult<QuickPayRequest> {
        let name = non_empty_str(self.name.as_ref());

        let (Some(name), Some(price)) = (name, self.price.as_ref()) else {
            return Err(PaymentError::InvalidRequest(MISSING_CHECKOUT_FIELDS.to_string()));
        };

        let cents = positive_integer(price)
            .ok_or_else(|| PaymentError::InvalidRequest(INVALID_PRICE.to_string()))?;

        let redirect_url = non_empty_str(self.redirect_url.as_ref()).unwrap_or(default_redirect_url);

        Ok(QuickPayRequest {
            idempotency_key: IdempotencyKey::fresh(),
            name: name.to_string(),
            price: Money::usd(cents),
            redirect_url: redirect_url.to_string(),
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
