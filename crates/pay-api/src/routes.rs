//! # Routes
//!
//! Axum router configuration for the storefront proxy.

use crate::cors;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - `OPTIONS *` - CORS preflight (answered by the CORS middleware)
/// - `GET  /health` - Health check
/// - `POST /create-payment` - Charge a card/wallet token
/// - `GET  /catalog` - Catalog items with variations and images
/// - `POST /checkout` - Create a hosted checkout link
/// - `GET  /payment-link-details?link=...` - Find an existing checkout link
///
/// Anything else, including a known path with the wrong method, is a 404.
pub fn create_router(state: AppState) -> Router {
    let cors = middleware::from_fn_with_state(state.cors.clone(), cors::cors_middleware);

    Router::new()
        .route("/health", any(handlers::health))
        .route(
            "/create-payment",
            post(handlers::create_payment).fallback(handlers::not_found),
        )
        .route(
            "/catalog",
            get(handlers::get_catalog).fallback(handlers::not_found),
        )
        .route(
            "/checkout",
            post(handlers::create_checkout).fallback(handlers::not_found),
        )
        .route(
            "/payment-link-details",
            get(handlers::payment_link_details).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
