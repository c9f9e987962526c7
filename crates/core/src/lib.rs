//! Harbor Core - Shared types library.
//!
//! This crate provides common types used across all Harbor components:
//! - `storefront` - Region-aware storefront data layer and JSON API
//! - `integration-tests` - End-to-end tests against a fake commerce backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, country codes, prices, sorting and paging

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
