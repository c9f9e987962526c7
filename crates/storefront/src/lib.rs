//! Harbor storefront library.
//!
//! Region-aware data layer over a headless commerce backend: region
//! resolution, product listing with in-memory sorting, catalog lookups and
//! cart pass-through, served as a JSON API. Exposed as a library so the
//! router can be exercised from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod cookies;
pub mod error;
pub mod middleware;
pub mod products;
pub mod regions;
pub mod routes;
pub mod state;
