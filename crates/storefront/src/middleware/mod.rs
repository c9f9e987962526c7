//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with `request_id` and `cache_id` fields)
//! 3. Request ID (honour or generate `x-request-id`)
//! 4. Cache ID (issue `_harbor_cache_id` cookie)

pub mod cache_id;
pub mod request_id;

pub use cache_id::cache_id_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
