//! # Payment Error Types
//!
//! Typed error handling for the storefront proxy.
//! Every operation returns `Result<T, PaymentError>`; the variant decides
//! both the HTTP status and what the caller is allowed to see.

use thiserror::Error;

/// Message returned to callers for every unexpected failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Client input rejected before any provider call
    #[error("{0}")]
    InvalidRequest(String),

    /// Provider reported a failure (non-2xx, or 2xx without the expected resource)
    #[error("{message}")]
    Provider { provider: String, message: String },

    /// Requested resource does not exist at the provider
    #[error("{0}")]
    NotFound(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Build a provider failure
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::Provider { .. } => 400,
            PaymentError::NotFound(_) => 404,
            PaymentError::Configuration(_) => 500,
            PaymentError::NetworkError(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Returns true for failures whose cause must stay out of the response body
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }

    /// The message a caller is allowed to see
    pub fn client_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
