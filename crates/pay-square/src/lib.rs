//! # pay-square
//!
//! Square implementation of the storefront's payment provider.
//!
//! Four endpoints are used:
//!
//! | Operation | Square endpoint |
//! |-----------|-----------------|
//! | `create_payment` | `POST /v2/payments` |
//! | `list_catalog` | `GET /v2/catalog/list?types=ITEM,IMAGE` |
//! | `create_payment_link` | `POST /v2/online-checkout/payment-links` |
//! | `list_payment_links` | `GET /v2/online-checkout/payment-links?limit=N` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_square::SquareClient;
//! use pay_core::PaymentProvider;
//!
//! // Reads SQUARE_ACCESS_TOKEN, SQUARE_LOCATION_ID, SQUARE_ENVIRONMENT
//! let client = SquareClient::from_env()?;
//!
//! let outcome = client.list_catalog().await?;
//! ```

pub mod client;
pub mod config;
pub mod types;

// Re-exports
pub use client::SquareClient;
pub use config::{SquareConfig, SquareEnvironment};
