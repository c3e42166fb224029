//! HTTP-level tests for the storefront proxy.
//!
//! The router runs against an in-memory provider that returns scripted
//! answers and records every outbound call it receives.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pay_api::{create_router, AppConfig, AppState};
use pay_core::{
    CatalogObject, ChargeRequest, CreatedPaymentLink, Payment, PaymentError, PaymentLinkRecord,
    PaymentProvider, PaymentResult, ProviderErrorDetail, ProviderOutcome, QuickPayRequest,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ============================================================================
// Fake provider
// ============================================================================

#[derive(Clone)]
enum Scripted<T> {
    Answer(ProviderOutcome<T>),
    NetworkDown,
}

impl<T: Clone> Scripted<T> {
    fn play(&self) -> PaymentResult<ProviderOutcome<T>> {
        match self {
            Scripted::Answer(outcome) => Ok(outcome.clone()),
            Scripted::NetworkDown => Err(PaymentError::NetworkError("connection reset".into())),
        }
    }
}

#[derive(Debug, Clone)]
enum Call {
    CreatePayment(ChargeRequest),
    ListCatalog,
    CreatePaymentLink(QuickPayRequest),
    ListPaymentLinks(u32),
}

struct FakeProvider {
    payment: Scripted<Payment>,
    catalog: Scripted<Vec<CatalogObject>>,
    link: Scripted<CreatedPaymentLink>,
    links: Scripted<Vec<PaymentLinkRecord>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            payment: Scripted::Answer(ProviderOutcome::Success(Payment {
                id: "pay_1".into(),
                status: "COMPLETED".into(),
            })),
            catalog: Scripted::Answer(ProviderOutcome::Success(vec![])),
            link: Scripted::Answer(ProviderOutcome::Success(CreatedPaymentLink {
                url: "https://square.link/u/abc123".into(),
                order_id: "ORDER1".into(),
            })),
            links: Scripted::Answer(ProviderOutcome::Success(vec![])),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeProvider {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_payment(&self, request: &ChargeRequest) -> PaymentResult<ProviderOutcome<Payment>> {
        self.record(Call::CreatePayment(request.clone()));
        self.payment.play()
    }

    async fn list_catalog(&self) -> PaymentResult<ProviderOutcome<Vec<CatalogObject>>> {
        self.record(Call::ListCatalog);
        self.catalog.play()
    }

    async fn create_payment_link(
        &self,
        request: &QuickPayRequest,
    ) -> PaymentResult<ProviderOutcome<CreatedPaymentLink>> {
        self.record(Call::CreatePaymentLink(request.clone()));
        self.link.play()
    }

    async fn list_payment_links(
        &self,
        limit: u32,
    ) -> PaymentResult<ProviderOutcome<Vec<PaymentLinkRecord>>> {
        self.record(Call::ListPaymentLinks(limit));
        self.links.play()
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

fn test_app_with(provider: Arc<FakeProvider>, config: AppConfig) -> Router {
    let state = AppState::with_provider(config, provider).unwrap();
    create_router(state)
}

fn test_app(provider: Arc<FakeProvider>) -> Router {
    test_app_with(provider, AppConfig::default())
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_raw(app: &Router, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    post_raw(app, uri, &body.to_string()).await
}

fn failure<T>(detail: Option<&str>) -> Scripted<T> {
    Scripted::Answer(ProviderOutcome::Failure(vec![ProviderErrorDetail {
        code: Some("BAD_REQUEST".into()),
        detail: detail.map(String::from),
        ..Default::default()
    }]))
}

// ============================================================================
// Routing & CORS
// ============================================================================

#[tokio::test]
async fn health_is_ok() {
    let app = test_app(Arc::default());

    let response = get(&app, "/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "ok"}));
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    let response = get(&app, "/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"error": "Not found"}));

    // Known path, wrong method
    let response = get(&app, "/create-payment").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"error": "Not found"}));

    let response = post(&app, "/catalog", json!({})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn preflight_returns_empty_body_with_cors_headers() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    for uri in ["/create-payment", "/anything/else"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Value::Null);
        assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn cors_origin_depends_on_request_origin() {
    let app = test_app(Arc::default());

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://otherdomain.com")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://www.cxhernandez.com"
    );

    // No Origin header at all, and error responses too
    let response = get(&app, "/missing").await;
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://www.cxhernandez.com"
    );
}

#[tokio::test]
async fn fixed_cors_variant_ignores_localhost() {
    let config = AppConfig {
        allow_localhost_origins: false,
        ..AppConfig::default()
    };
    let app = test_app_with(Arc::default(), config);

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://127.0.0.1:1313")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://www.cxhernandez.com"
    );
}

// ============================================================================
// POST /create-payment
// ============================================================================

#[tokio::test]
async fn create_payment_end_to_end() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    let response = post(
        &app,
        "/create-payment",
        json!({"sourceId": "cnon:card-nonce-ok", "amount": 2500}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"success": true, "paymentId": "pay_1", "status": "COMPLETED"})
    );

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let Call::CreatePayment(charge) = &calls[0] else {
        panic!("unexpected call {:?}", calls[0]);
    };
    assert_eq!(charge.source_id, "cnon:card-nonce-ok");
    assert_eq!(charge.amount.amount, 2500);
    assert_eq!(charge.note, "Photography Store: Purchase");
    assert_eq!(charge.buyer_email, None);
}

#[tokio::test]
async fn create_payment_forwards_title_and_email() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    post(
        &app,
        "/create-payment",
        json!({
            "sourceId": "cnon:card-nonce-ok",
            "amount": 4500,
            "item": "print-8x10",
            "title": "Golden Gate at Dusk",
            "email": "buyer@example.com"
        }),
    )
    .await;

    let calls = provider.calls();
    let Call::CreatePayment(charge) = &calls[0] else {
        panic!("expected a payment call");
    };
    assert_eq!(charge.note, "Photography Store: Golden Gate at Dusk");
    assert_eq!(charge.buyer_email.as_deref(), Some("buyer@example.com"));
}

#[tokio::test]
async fn create_payment_validation_makes_no_provider_call() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    let cases = [
        (json!({"amount": 2500}), "Missing required fields: sourceId and amount"),
        (json!({"sourceId": "tok"}), "Missing required fields: sourceId and amount"),
        (json!({"sourceId": "tok", "amount": 0}), "Missing required fields: sourceId and amount"),
        (json!({"sourceId": "tok", "amount": 12.5}), "Invalid amount"),
        (json!({"sourceId": "tok", "amount": -100}), "Invalid amount"),
        (json!({"sourceId": "tok", "amount": "2500"}), "Invalid amount"),
    ];

    for (body, message) in cases {
        let response = post(&app, "/create-payment", body.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(response.body, json!({"success": false, "error": message}));
    }

    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn create_payment_provider_error_detail() {
    let provider = Arc::new(FakeProvider {
        payment: failure(Some("Card declined.")),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = post(&app, "/create-payment", json!({"sourceId": "tok", "amount": 100})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"success": false, "error": "Card declined."}));
}

#[tokio::test]
async fn create_payment_provider_error_without_detail() {
    let provider = Arc::new(FakeProvider {
        payment: Scripted::Answer(ProviderOutcome::Failure(vec![])),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = post(&app, "/create-payment", json!({"sourceId": "tok", "amount": 100})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"success": false, "error": "Payment failed"}));
}

#[tokio::test]
async fn create_payment_network_failure_is_generic_500() {
    let provider = Arc::new(FakeProvider {
        payment: Scripted::NetworkDown,
        ..Default::default()
    });
    let app = test_app(provider);

    let response = post(&app, "/create-payment", json!({"sourceId": "tok", "amount": 100})).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Internal server error"})
    );
}

#[tokio::test]
async fn malformed_json_is_generic_500() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    let response = post_raw(&app, "/create-payment", "{\"sourceId\": ").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Internal server error"})
    );
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn identical_requests_get_distinct_idempotency_keys() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());
    let body = json!({"sourceId": "cnon:card-nonce-ok", "amount": 2500});

    post(&app, "/create-payment", body.clone()).await;
    post(&app, "/create-payment", body).await;

    let keys: Vec<_> = provider
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::CreatePayment(charge) => Some(charge.idempotency_key),
            _ => None,
        })
        .collect();

    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
}

// ============================================================================
// POST /checkout
// ============================================================================

#[tokio::test]
async fn checkout_creates_link() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    let response = post(&app, "/checkout", json!({"name": "Print", "price": 4500})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "success": true,
            "checkoutUrl": "https://square.link/u/abc123",
            "orderId": "ORDER1"
        })
    );

    let calls = provider.calls();
    let Call::CreatePaymentLink(request) = &calls[0] else {
        panic!("expected a payment link call");
    };
    assert_eq!(request.name, "Print");
    assert_eq!(request.price.amount, 4500);
    assert_eq!(request.redirect_url, "https://www.cxhernandez.com/store/success");
}

#[tokio::test]
async fn checkout_uses_caller_redirect() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    post(
        &app,
        "/checkout",
        json!({"name": "Print", "price": 4500, "redirectUrl": "https://www.cxhernandez.com/thanks"}),
    )
    .await;

    let calls = provider.calls();
    let Call::CreatePaymentLink(request) = &calls[0] else {
        panic!("expected a payment link call");
    };
    assert_eq!(request.redirect_url, "https://www.cxhernandez.com/thanks");
}

#[tokio::test]
async fn checkout_zero_price_is_invalid_without_provider_call() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    let response = post(&app, "/checkout", json!({"name": "Print", "price": 0})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"success": false, "error": "Invalid price"}));

    let response = post(&app, "/checkout", json!({"price": 100})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Missing required fields: name and price"})
    );

    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn checkout_provider_failure_falls_back() {
    let provider = Arc::new(FakeProvider {
        link: failure(None),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = post(&app, "/checkout", json!({"name": "Print", "price": 4500})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Failed to create checkout"})
    );
}

// ============================================================================
// GET /catalog
// ============================================================================

#[tokio::test]
async fn catalog_joins_items_and_images() {
    let objects: Vec<CatalogObject> = serde_json::from_value(json!([
        {"type": "IMAGE", "id": "img_1", "image_data": {"url": "https://cdn.example/1.jpg"}},
        {
            "type": "ITEM",
            "id": "item_1",
            "item_data": {
                "name": "Golden Gate Print",
                "image_ids": ["img_1", "img_missing"],
                "variations": [{
                    "id": "var_1",
                    "item_variation_data": {"name": "8x10", "price_money": {"amount": 4500, "currency": "USD"}}
                }]
            }
        }
    ]))
    .unwrap();

    let provider = Arc::new(FakeProvider {
        catalog: Scripted::Answer(ProviderOutcome::Success(objects)),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/catalog").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "success": true,
            "items": [{
                "id": "item_1",
                "name": "Golden Gate Print",
                "description": "",
                "variations": [{"id": "var_1", "name": "8x10", "price": 4500, "currency": "USD"}],
                "images": ["https://cdn.example/1.jpg"]
            }]
        })
    );
}

#[tokio::test]
async fn catalog_failure() {
    let provider = Arc::new(FakeProvider {
        catalog: failure(None),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/catalog").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Failed to fetch catalog"})
    );
}

#[tokio::test]
async fn catalog_network_failure() {
    let provider = Arc::new(FakeProvider {
        catalog: Scripted::NetworkDown,
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/catalog").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Internal server error");
}

// ============================================================================
// GET /payment-link-details
// ============================================================================

fn stored_links() -> Vec<PaymentLinkRecord> {
    vec![
        PaymentLinkRecord::new(json!({
            "id": "LINK0",
            "url": "https://square.link/u/zzz999",
            "order_id": "ORDER0"
        })),
        PaymentLinkRecord::new(json!({
            "id": "LINK1",
            "url": "https://square.link/u/abc123",
            "order_id": "ORDER1",
            "quick_pay": {"name": "Print", "price_money": {"amount": 4500, "currency": "USD"}}
        })),
    ]
}

#[tokio::test]
async fn link_lookup_matches_url_suffix_and_path() {
    let provider = Arc::new(FakeProvider {
        links: Scripted::Answer(ProviderOutcome::Success(stored_links())),
        ..Default::default()
    });
    let app = test_app(provider.clone());

    for query in [
        "https%3A%2F%2Fsquare.link%2Fu%2Fabc123",
        "abc123",
        "/u/abc123",
    ] {
        let response = get(&app, &format!("/payment-link-details?link={query}")).await;
        assert_eq!(response.status, StatusCode::OK, "query {query}");
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["payment_link"], stored_links()[1].as_value().clone());
    }

    assert!(provider
        .calls()
        .iter()
        .all(|call| matches!(call, Call::ListPaymentLinks(100))));
}

#[tokio::test]
async fn link_lookup_no_match_is_404() {
    let provider = Arc::new(FakeProvider {
        links: Scripted::Answer(ProviderOutcome::Success(stored_links())),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/payment-link-details?link=nope42").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Payment link not found"})
    );
}

#[tokio::test]
async fn link_lookup_query_without_path_is_404() {
    let provider = Arc::new(FakeProvider {
        links: Scripted::Answer(ProviderOutcome::Success(stored_links())),
        ..Default::default()
    });
    let app = test_app(provider);

    for query in ["%3Fx", "%23frag", "%3Fanything%3D1"] {
        let response = get(&app, &format!("/payment-link-details?link={query}")).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "query {query}");
        assert_eq!(response.body["error"], "Payment link not found");
    }
}

#[tokio::test]
async fn link_lookup_matches_long_url() {
    let mut links = stored_links();
    links.push(PaymentLinkRecord::new(json!({
        "id": "LINK2",
        "url": "https://square.link/u/def456",
        "long_url": "https://checkout.square.site/merchant/M1/checkout/CHK42",
        "order_id": "ORDER2"
    })));
    let provider = Arc::new(FakeProvider {
        links: Scripted::Answer(ProviderOutcome::Success(links)),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/payment-link-details?link=%2Fcheckout%2FCHK42").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["payment_link"]["id"], "LINK2");
}

#[tokio::test]
async fn link_lookup_requires_link_param() {
    let provider = Arc::new(FakeProvider::default());
    let app = test_app(provider.clone());

    for uri in ["/payment-link-details", "/payment-link-details?link="] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body,
            json!({"success": false, "error": "Missing query parameter: link"})
        );
    }

    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn link_lookup_list_failure() {
    let provider = Arc::new(FakeProvider {
        links: failure(Some("Merchant not onboarded for online checkout.")),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/payment-link-details?link=abc123").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Merchant not onboarded for online checkout."
    );

    let provider = Arc::new(FakeProvider {
        links: failure(None),
        ..Default::default()
    });
    let app = test_app(provider);

    let response = get(&app, "/payment-link-details?link=abc123").await;
    assert_eq!(response.body["error"], "Failed to list payment links");
}
