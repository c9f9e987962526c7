//! Core types for Harbor.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod id;
pub mod page;
pub mod price;
pub mod sort;

pub use country::{CountryCode, CountryCodeError};
pub use id::*;
pub use page::{PageRequest, PageRequestError};
pub use price::Price;
pub use sort::{SortOption, SortOptionError};
