//! # pay-api
//!
//! HTTP API layer for square-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Per-request CORS selection and preflight handling
//! - JSON endpoints that translate storefront requests into Square calls
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | OPTIONS | `*` | CORS preflight |
//! | GET | `/health` | Health check |
//! | POST | `/create-payment` | Charge a card/wallet token |
//! | GET | `/catalog` | List catalog items |
//! | POST | `/checkout` | Create hosted checkout link |
//! | GET | `/payment-link-details?link=` | Find an existing checkout link |

pub mod cors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
