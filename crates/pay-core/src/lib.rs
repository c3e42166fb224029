//! # pay-core
//!
//! Core types and traits for the square-relay storefront proxy.
//!
//! This crate provides:
//! - `PaymentProvider` trait for the upstream payments API, with the tagged
//!   `ProviderOutcome` result
//! - `PaymentRequestBody` and `CheckoutRequestBody` validation
//! - `build_catalog` for joining catalog ITEM and IMAGE records
//! - `find_payment_link` for locating a hosted checkout link by URL
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{PaymentRequestBody, PaymentProvider};
//!
//! let body: PaymentRequestBody = serde_json::from_slice(&bytes)?;
//! let charge = body.validate("Photography Store")?;
//!
//! let payment = provider
//!     .create_payment(&charge)
//!     .await?
//!     .into_result(provider.provider_name(), "Payment failed")?;
//! ```

pub mod catalog;
pub mod error;
pub mod link;
pub mod money;
pub mod provider;
pub mod request;

// Re-exports for convenience
pub use catalog::{build_catalog, CatalogItem, CatalogObject, Variation};
pub use error::{PaymentError, PaymentResult, INTERNAL_ERROR_MESSAGE};
pub use link::{find_payment_link, link_matches, PaymentLinkRecord, PAYMENT_LINK_PAGE_SIZE};
pub use money::{Currency, Money};
pub use provider::{
    BoxedPaymentProvider, ChargeRequest, CreatedPaymentLink, IdempotencyKey, Payment,
    PaymentProvider, ProviderErrorDetail, ProviderOutcome, QuickPayRequest,
};
pub use request::{CheckoutRequestBody, PaymentRequestBody};
