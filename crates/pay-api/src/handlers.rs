//! # Request Handlers
//!
//! Axum request handlers for the storefront proxy.
//! Each handler validates its input, makes one provider call and reshapes
//! the provider's answer for the browser.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{
    build_catalog, find_payment_link, CatalogItem, CheckoutRequestBody, PaymentError,
    PaymentLinkRecord, PaymentRequestBody, PAYMENT_LINK_PAGE_SIZE,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

pub const PAYMENT_FAILED: &str = "Payment failed";
pub const CHECKOUT_FAILED: &str = "Failed to create checkout";
pub const CATALOG_FAILED: &str = "Failed to fetch catalog";
pub const LINK_LIST_FAILED: &str = "Failed to list payment links";
pub const LINK_NOT_FOUND: &str = "Payment link not found";
pub const MISSING_LINK_PARAM: &str = "Missing query parameter: link";

// =============================================================================
// Request/Response Types
// =============================================================================

/// `POST /create-payment` success body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub success: bool,
    pub payment_id: String,
    pub status: String,
}

/// `POST /checkout` success body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub checkout_url: String,
    pub order_id: String,
}

/// `GET /catalog` success body
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub items: Vec<CatalogItem>,
}

/// `GET /payment-link-details` success body
#[derive(Debug, Serialize)]
pub struct PaymentLinkDetailsResponse {
    pub success: bool,
    pub payment_link: PaymentLinkRecord,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

fn payment_error_to_response(err: &PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.client_message())))
}

/// Handler error; unexpected failures are logged here and never shown to the caller.
#[derive(Debug)]
pub struct ApiError(pub PaymentError);

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_internal() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(status = self.0.status_code(), error = %self.0, "Request rejected");
        }
        payment_error_to_response(&self.0).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, PaymentError> {
    Ok(serde_json::from_slice(body)?)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Fallback for every unknown method/path pair
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Charge a card/wallet token
#[instrument(skip(state, body))]
pub async fn create_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<CreatePaymentResponse> {
    let request: PaymentRequestBody = parse_body(&body)?;
    let charge = request.validate(&state.config.note_prefix)?;

    info!(
        "Creating payment: amount={}, note={:?}",
        charge.amount.display(),
        charge.note
    );

    let provider = &state.provider;
    let payment = provider
        .create_payment(&charge)
        .await?
        .into_result(provider.provider_name(), PAYMENT_FAILED)?;

    info!("Payment {} is {}", payment.id, payment.status);

    Ok(Json(CreatePaymentResponse {
        success: true,
        payment_id: payment.id,
        status: payment.status,
    }))
}

/// Create a hosted checkout link for a single named price
#[instrument(skip(state, body))]
pub async fn create_checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<CheckoutResponse> {
    let request: CheckoutRequestBody = parse_body(&body)?;
    let quick_pay = request.validate(&state.config.checkout_redirect_url)?;

    info!(
        "Creating checkout: name={:?}, price={}",
        quick_pay.name,
        quick_pay.price.display()
    );

    let provider = &state.provider;
    let link = provider
        .create_payment_link(&quick_pay)
        .await?
        .into_result(provider.provider_name(), CHECKOUT_FAILED)?;

    Ok(Json(CheckoutResponse {
        success: true,
        checkout_url: link.url,
        order_id: link.order_id,
    }))
}

/// List catalog items with their variations and image URLs
#[instrument(skip(state))]
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<CatalogResponse> {
    let provider = &state.provider;
    let objects = provider
        .list_catalog()
        .await?
        .into_result(provider.provider_name(), CATALOG_FAILED)?;

    let items = build_catalog(&objects);
    info!("Catalog: {} objects, {} items", objects.len(), items.len());

    Ok(Json(CatalogResponse {
        success: true,
        items,
    }))
}

/// Look up an existing payment link by URL, URL suffix or path
#[instrument(skip(state, params))]
pub async fn payment_link_details(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<PaymentLinkDetailsResponse> {
    let query = params
        .get("link")
        .map(String::as_str)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| PaymentError::InvalidRequest(MISSING_LINK_PARAM.to_string()))?;

    let provider = &state.provider;
    let links = provider
        .list_payment_links(PAYMENT_LINK_PAGE_SIZE)
        .await?
        .into_result(provider.provider_name(), LINK_LIST_FAILED)?;

    let found = find_payment_link(&links, query).ok_or_else(|| {
        info!("No payment link matching {:?} among {}", query, links.len());
        PaymentError::NotFound(LINK_NOT_FOUND.to_string())
    })?;

    Ok(Json(PaymentLinkDetailsResponse {
        success: true,
        payment_link: found.clone(),
    }))
}
