//! # Money
//!
//! Amounts are always integers in the smallest currency unit (cents).
//! The storefront only sells in USD.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount in smallest currency unit, in the provider's `{amount, currency}` shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub currency: Currency,
}

impl Money {
    /// Create an amount from cents
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// USD amount from cents
    pub fn usd(amount: i64) -> Self {
        Self::from_cents(amount, Currency::USD)
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("${}.{:02}", self.amount / 100, (self.amount % 100).abs())
    }
}

/// Truthiness of a JSON value as browsers treat it:
/// `null`, `false`, `0` and `""` are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the value as cents if it is an integral JSON number greater than zero.
///
/// `2500` and `2500.0` are accepted; `25.5`, `"2500"`, `0` and negatives are not.
pub fn positive_integer(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };

    if let Some(i) = n.as_i64() {
        return (i > 0).then_some(i);
    }

    let f = n.as_f64()?;
    if f.fract() == 0.0 && f > 0.0 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
