//! # Square Client
//!
//! `PaymentProvider` implementation over the Square REST API.
//! Each method makes exactly one HTTP call; there are no retries.

use crate::config::SquareConfig;
use crate::types::{
    CatalogListEnvelope, CreatePaymentBody, CreatePaymentLinkBody, PaymentEnvelope,
    PaymentLinkEnvelope, PaymentLinkListEnvelope,
};
use async_trait::async_trait;
use pay_core::{
    CatalogObject, ChargeRequest, CreatedPaymentLink, Payment, PaymentError, PaymentLinkRecord,
    PaymentProvider, PaymentResult, ProviderErrorDetail, ProviderOutcome, QuickPayRequest,
};
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "square";

/// Square API client
pub struct SquareClient {
    config: SquareConfig,
    client: Client,
}

impl SquareClient {
    /// Create a new Square client
    pub fn new(config: SquareConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = SquareConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &SquareConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, self.config.auth_header())
            .header("Square-Version", &self.config.api_version)
    }

    /// Send the request and decode the JSON body whatever the status.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PaymentResult<(StatusCode, T)> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let envelope = serde_json::from_slice(&body).map_err(|e| {
            PaymentError::Serialization(format!(
                "Failed to parse Square response (HTTP {}): {}",
                status, e
            ))
        })?;

        Ok((status, envelope))
    }
}

fn log_failure(operation: &str, status: StatusCode, errors: &[ProviderErrorDetail]) {
    error!(
        operation = operation,
        status = %status,
        errors = %serde_json::to_string(errors).unwrap_or_default(),
        "Square API error"
    );
}

#[async_trait]
impl PaymentProvider for SquareClient {
    #[instrument(skip(self, request), fields(idempotency_key = %request.idempotency_key, amount = request.amount.amount))]
    async fn create_payment(&self, request: &ChargeRequest) -> PaymentResult<ProviderOutcome<Payment>> {
        let body = CreatePaymentBody::new(request, &self.config.location_id);
        let http = self.client.post(self.config.endpoint("/payments")).json(&body);

        let (status, envelope): (_, PaymentEnvelope) = self.send(http).await?;

        match envelope.payment {
            Some(payment) if status.is_success() => {
                info!("Created Square payment: id={}, status={}", payment.id, payment.status);
                Ok(ProviderOutcome::Success(payment))
            }
            _ => {
                log_failure("create_payment", status, &envelope.errors);
                Ok(ProviderOutcome::Failure(envelope.errors))
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_catalog(&self) -> PaymentResult<ProviderOutcome<Vec<CatalogObject>>> {
        let http = self
            .client
            .get(self.config.endpoint("/catalog/list"))
            .query(&[("types", "ITEM,IMAGE")]);

        let (status, envelope): (_, CatalogListEnvelope) = self.send(http).await?;

        if !status.is_success() {
            log_failure("list_catalog", status, &envelope.errors);
            return Ok(ProviderOutcome::Failure(envelope.errors));
        }

        debug!("Fetched {} catalog objects", envelope.objects.len());
        Ok(ProviderOutcome::Success(envelope.objects))
    }

    #[instrument(skip(self, request), fields(idempotency_key = %request.idempotency_key, name = %request.name))]
    async fn create_payment_link(
        &self,
        request: &QuickPayRequest,
    ) -> PaymentResult<ProviderOutcome<CreatedPaymentLink>> {
        let body = CreatePaymentLinkBody::new(request, &self.config.location_id);
        let http = self
            .client
            .post(self.config.endpoint("/online-checkout/payment-links"))
            .json(&body);

        let (status, envelope): (_, PaymentLinkEnvelope) = self.send(http).await?;

        match envelope.payment_link {
            Some(link) if status.is_success() => {
                info!("Created Square payment link: url={}, order={}", link.url, link.order_id);
                Ok(ProviderOutcome::Success(link))
            }
            _ => {
                log_failure("create_payment_link", status, &envelope.errors);
                Ok(ProviderOutcome::Failure(envelope.errors))
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_payment_links(
        &self,
        limit: u32,
    ) -> PaymentResult<ProviderOutcome<Vec<PaymentLinkRecord>>> {
        let http = self
            .client
            .get(self.config.endpoint("/online-checkout/payment-links"))
            .query(&[("limit", limit)]);

        let (status, envelope): (_, PaymentLinkListEnvelope) = self.send(http).await?;

        if !status.is_success() {
            log_failure("list_payment_links", status, &envelope.errors);
            return Ok(ProviderOutcome::Failure(envelope.errors));
        }

        debug!("Fetched {} payment links", envelope.payment_links.len());
        Ok(ProviderOutcome::Success(envelope.payment_links))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
