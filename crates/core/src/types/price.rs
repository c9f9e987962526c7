//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts come from the backend's calculated prices and are already in the
/// currency's standard unit (e.g., dollars, not cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code, lowercase as returned by the backend.
    pub currency_code: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Currency symbol for the most common storefront currencies, falling
    /// back to the uppercase ISO code.
    #[must_use]
    pub fn symbol(&self) -> String {
        match self.currency_code.to_ascii_lowercase().as_str() {
            "usd" | "cad" | "aud" => "$".to_string(),
            "eur" => "€".to_string(),
            "gbp" => "£".to_string(),
            "dkk" | "sek" | "nok" => "kr ".to_string(),
            other => format!("{} ", other.to_ascii_uppercase()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.symbol(), self.amount.round_dp(2))
    }
}
