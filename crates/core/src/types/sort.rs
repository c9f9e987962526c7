//! Sort options for product listings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SortOption`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort option: {0} (expected price_asc, price_desc or created_at)")]
pub struct SortOptionError(pub String);

/// How a product listing is ordered.
///
/// The backend cannot sort by computed (region-specific) prices, so every
/// option here is applied in memory by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Cheapest variant price, low to high.
    #[default]
    PriceAsc,
    /// Cheapest variant price, high to low.
    PriceDesc,
    /// Newest first.
    CreatedAt,
}

impl SortOption {
    /// Query-string form of the option.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::CreatedAt => "created_at",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::PriceAsc => "Price: Low -> High",
            Self::PriceDesc => "Price: High -> Low",
            Self::CreatedAt => "Latest Arrivals",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOption {
    type Err = SortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(SortOptionError(other.to_string())),
        }
    }
}
