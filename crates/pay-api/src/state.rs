//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the deployment configuration and the payment provider client.

use crate::cors::CorsPolicy;
use anyhow::Context;
use pay_core::BoxedPaymentProvider;
use pay_square::SquareClient;
use std::sync::Arc;

/// Origin of the production storefront
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://www.cxhernandez.com";

/// Prefix of the note attached to every payment
pub const DEFAULT_NOTE_PREFIX: &str = "Photography Store";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Origin allowed by the fixed CORS header set
    pub allowed_origin: String,
    /// Answer localhost origins with the wildcard CORS header set
    pub allow_localhost_origins: bool,
    /// Where hosted checkout sends buyers when the request names no redirect
    pub checkout_redirect_url: String,
    /// Payment note prefix, e.g. "Photography Store: 8x10 Print"
    pub note_prefix: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source, with defaults for
    /// anything unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var_or = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let allowed_origin =
            var_or("ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN).trim_end_matches('/').to_string();
        let checkout_redirect_url = var_or(
            "CHECKOUT_REDIRECT_URL",
            &default_redirect_url(&allowed_origin),
        );

        Self {
            host: var_or("HOST", "127.0.0.1"),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8080),
            environment: var_or("ENVIRONMENT", "development"),
            allow_localhost_origins: lookup("CORS_ALLOW_LOCALHOST")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            allowed_origin,
            checkout_redirect_url,
            note_prefix: var_or("PAYMENT_NOTE_PREFIX", DEFAULT_NOTE_PREFIX),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn cors_policy(&self) -> anyhow::Result<CorsPolicy> {
        CorsPolicy::new(&self.allowed_origin, self.allow_localhost_origins)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            allow_localhost_origins: true,
            checkout_redirect_url: default_redirect_url(DEFAULT_ALLOWED_ORIGIN),
            note_prefix: DEFAULT_NOTE_PREFIX.to_string(),
        }
    }
}

fn default_redirect_url(origin: &str) -> String {
    format!("{}/store/success", origin)
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Upstream payments API
    pub provider: BoxedPaymentProvider,
    /// Application config
    pub config: Arc<AppConfig>,
    /// CORS header selection, built once from the config
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    /// Create a new AppState backed by Square, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let square = SquareClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Square: {}", e))?;

        tracing::info!(
            "Square environment: {}, location: {}",
            square.config().environment.as_str(),
            square.config().location_id
        );

        Self::with_provider(config, Arc::new(square))
    }

    /// Create state around any provider (fakes in tests, mocks in staging)
    pub fn with_provider(config: AppConfig, provider: BoxedPaymentProvider) -> anyhow::Result<Self> {
        let cors = config.cors_policy()?;

        Ok(Self {
            provider,
            config: Arc::new(config),
            cors: Arc::new(cors),
        })
    }
}
