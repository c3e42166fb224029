//! # Payment Provider Trait
//!
//! The storefront proxy talks to exactly one upstream payments API. Handlers
//! only see this trait, so they can run against the real provider or against
//! an in-memory fake.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── create_payment()                                       │
//! │  ├── list_catalog()                                         │
//! │  ├── create_payment_link()                                  │
//! │  └── list_payment_links()                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │    SquareClient   │
//!                  └───────────────────┘
//! ```
//!
//! Transport problems come back as `Err(PaymentError)`. A provider that
//! answered but refused the request comes back as
//! `Ok(ProviderOutcome::Failure(errors))`.

use crate::catalog::CatalogObject;
use crate::error::{PaymentError, PaymentResult};
use crate::link::PaymentLinkRecord;
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Caller-generated token that lets the provider drop duplicate submissions.
///
/// A new key is minted for every outbound create call and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the provider's `errors` array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Result of a provider call that reached the provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome<T> {
    Success(T),
    Failure(Vec<ProviderErrorDetail>),
}

impl<T> ProviderOutcome<T> {
    /// The first non-empty error detail reported by the provider
    pub fn first_detail(&self) -> Option<&str> {
        match self {
            ProviderOutcome::Success(_) => None,
            ProviderOutcome::Failure(errors) => errors
                .first()
                .and_then(|e| e.detail.as_deref())
                .filter(|d| !d.is_empty()),
        }
    }

    /// Convert into a result, using `fallback` when the provider gave no detail
    pub fn into_result(self, provider: &str, fallback: &str) -> PaymentResult<T> {
        let message = self.first_detail().unwrap_or(fallback).to_string();
        match self {
            ProviderOutcome::Success(value) => Ok(value),
            ProviderOutcome::Failure(_) => Err(PaymentError::provider(provider, message)),
        }
    }
}

/// Validated card/wallet charge, ready to send upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub idempotency_key: IdempotencyKey,
    pub source_id: String,
    pub amount: Money,
    pub note: String,
    pub buyer_email: Option<String>,
}

/// Validated hosted-checkout request for a single named price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPayRequest {
    pub idempotency_key: IdempotencyKey,
    pub name: String,
    pub price: Money,
    pub redirect_url: String,
}

/// A payment the provider accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

/// A hosted checkout page the provider created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPaymentLink {
    pub url: String,
    #[serde(default)]
    pub order_id: String,
}

/// Client interface to the upstream payments API.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Charge a card/wallet source token.
    async fn create_payment(&self, request: &ChargeRequest) -> PaymentResult<ProviderOutcome<Payment>>;

    /// List every ITEM and IMAGE object in the catalog (single page).
    async fn list_catalog(&self) -> PaymentResult<ProviderOutcome<Vec<CatalogObject>>>;

    /// Create a hosted checkout link for a quick-pay order.
    async fn create_payment_link(
        &self,
        request: &QuickPayRequest,
    ) -> PaymentResult<ProviderOutcome<CreatedPaymentLink>>;

    /// List existing checkout links, at most `limit` of them.
    async fn list_payment_links(
        &self,
        limit: u32,
    ) -> PaymentResult<ProviderOutcome<Vec<PaymentLinkRecord>>>;

    /// Get the provider name (for logging and error attribution).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
