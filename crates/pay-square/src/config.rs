//! # Square Configuration
//!
//! Configuration management for the Square integration.
//! All secrets are loaded from environment variables.

use pay_core::PaymentError;
use std::env;

pub const SANDBOX_API_BASE_URL: &str = "https://connect.squareupsandbox.com/v2";
pub const PRODUCTION_API_BASE_URL: &str = "https://connect.squareup.com/v2";
pub const DEFAULT_API_VERSION: &str = "2024-01-18";

/// Which Square environment requests go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquareEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl SquareEnvironment {
    /// `production` selects production; any other value is sandbox.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            SquareEnvironment::Production
        } else {
            SquareEnvironment::Sandbox
        }
    }

    pub fn api_base_url(&self) -> &'static str {
        match self {
            SquareEnvironment::Sandbox => SANDBOX_API_BASE_URL,
            SquareEnvironment::Production => PRODUCTION_API_BASE_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SquareEnvironment::Sandbox => "sandbox",
            SquareEnvironment::Production => "production",
        }
    }
}

/// Square API configuration
#[derive(Clone)]
pub struct SquareConfig {
    /// Bearer access token
    pub access_token: String,

    /// Location that payments and links are attributed to
    pub location_id: String,

    pub environment: SquareEnvironment,

    /// API base URL including the `/v2` prefix (overridable for mocking)
    pub api_base_url: String,

    /// Value of the `Square-Version` header
    pub api_version: String,
}

impl SquareConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SQUARE_ACCESS_TOKEN`
    /// - `SQUARE_LOCATION_ID`
    ///
    /// Optional:
    /// - `SQUARE_ENVIRONMENT` (`production` or anything else for sandbox)
    /// - `SQUARE_API_BASE_URL` (overrides the environment's base URL)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let access_token = required_var(&lookup, "SQUARE_ACCESS_TOKEN")?;
        let location_id = required_var(&lookup, "SQUARE_LOCATION_ID")?;

        let environment = lookup("SQUARE_ENVIRONMENT")
            .map(|v| SquareEnvironment::parse(&v))
            .unwrap_or_default();

        let mut config = Self::new(access_token, location_id, environment);
        if let Some(base) = lookup("SQUARE_API_BASE_URL") {
            if !base.trim().is_empty() {
                config = config.with_api_base_url(base);
            }
        }

        Ok(config)
    }

    /// Create config with explicit values
    pub fn new(
        access_token: impl Into<String>,
        location_id: impl Into<String>,
        environment: SquareEnvironment,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            location_id: location_id.into(),
            environment,
            api_base_url: environment.api_base_url().to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == SquareEnvironment::Production
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Full URL for an API path such as `/payments`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

// The token never reaches logs.
impl std::fmt::Debug for SquareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquareConfig")
            .field("access_token", &"<redacted>")
            .field("location_id", &self.location_id)
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn required_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, PaymentError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PaymentError::Configuration(format!("{} not set", name))),
    }
}
