//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKEND_URL` - Commerce backend base URL (e.g., <https://api.example.com>)
//! - `BACKEND_PUBLISHABLE_KEY` - Publishable API key identifying the sales channel
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `STOREFRONT_DEFAULT_REGION` - Fallback country code (default: us)
//! - `STOREFRONT_SECURE_COOKIES` - Set `Secure` on cookies (default: true)
//! - `STOREFRONT_REVALIDATE_SECRET` - Secret for the cache revalidation endpoint
//! - `REGION_CACHE_TTL_SECS` - Region cache TTL (default: 3600)
//! - `CATALOG_CACHE_TTL_SECS` - Collection/category cache TTL (default: 300)
//! - `SORT_FETCH_LIMIT` - Backend batch size for sorted listings (default: 100)
//! - `SORT_MAX_RECORDS` - Upper bound on records sorted in memory (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use harbor_core::CountryCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MIN_REVALIDATE_SECRET_LENGTH: usize = 24;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Country used when a request carries none
    pub default_region: CountryCode,
    /// Whether cookies are marked `Secure`
    pub secure_cookies: bool,
    /// Secret guarding `POST /api/cache/revalidate` (endpoint disabled when unset)
    pub revalidate_secret: Option<SecretString>,
    /// Commerce backend configuration
    pub backend: BackendConfig,
    /// Cache and sorting knobs
    pub cache: CacheConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Commerce backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the store API
    pub base_url: Url,
    /// Publishable API key (public, identifies the sales channel)
    pub publishable_key: String,
}

/// Cache lifetimes and in-memory sort bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long resolved regions stay cached
    pub region_ttl: Duration,
    /// How long collections and categories stay cached
    pub catalog_ttl: Duration,
    /// Records requested per backend call by the sorted listing
    pub sort_fetch_limit: u32,
    /// Maximum number of records sorted in memory
    pub sort_max_records: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            region_ttl: Duration::from_secs(3600),
            catalog_ttl: Duration::from_secs(300),
            sort_fetch_limit: 100,
            sort_max_records: 1000,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("STOREFRONT_PORT", "8000")?;
        let default_region = parse_env_or_default("STOREFRONT_DEFAULT_REGION", "us")?;
        let secure_cookies = parse_env_or_default("STOREFRONT_SECURE_COOKIES", "true")?;
        let revalidate_secret = get_optional_env("STOREFRONT_REVALIDATE_SECRET")
            .map(|value| {
                validate_secret_strength(&value, "STOREFRONT_REVALIDATE_SECRET")?;
                Ok(SecretString::from(value))
            })
            .transpose()?;

        let backend = BackendConfig::from_env()?;
        let cache = CacheConfig::from_env()?;

        Ok(Self {
            host,
            port,
            default_region,
            secure_cookies,
            revalidate_secret,
            backend,
            cache,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("BACKEND_URL")?;
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string()))?;

        let publishable_key = get_required_env("BACKEND_PUBLISHABLE_KEY")?;
        if publishable_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "BACKEND_PUBLISHABLE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            publishable_key,
        })
    }
}

impl CacheConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let region_ttl: u64 = parse_env_or_default("REGION_CACHE_TTL_SECS", "3600")?;
        let catalog_ttl: u64 = parse_env_or_default("CATALOG_CACHE_TTL_SECS", "300")?;
        let sort_fetch_limit: u32 = parse_env_or_default("SORT_FETCH_LIMIT", "100")?;
        let sort_max_records: u32 = parse_env_or_default("SORT_MAX_RECORDS", "1000")?;

        if sort_fetch_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SORT_FETCH_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if sort_max_records < sort_fetch_limit {
            return Err(ConfigError::InvalidEnvVar(
                "SORT_MAX_RECORDS".to_string(),
                format!("must be at least SORT_FETCH_LIMIT ({sort_fetch_limit})"),
            ));
        }

        Ok(Self {
            region_ttl: Duration::from_secs(region_ttl),
            catalog_ttl: Duration::from_secs(catalog_ttl),
            sort_fetch_limit,
            sort_max_records,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is long enough, not a placeholder, and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_REVALIDATE_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_REVALIDATE_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            default_region: CountryCode::parse("us").unwrap(),
            secure_cookies: false,
            revalidate_secret: None,
            backend: BackendConfig {
                base_url: Url::parse("http://localhost:9000").unwrap(),
                publishable_key: "pk_test".to_string(),
            },
            cache: CacheConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_too_short() {
        let result = validate_secret_strength("aB3$xY9!", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-revalidate-token-goes-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"ab".repeat(20), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_env_or_default_uses_default() {
        let port: u16 = parse_env_or_default("HARBOR_TEST_UNSET_PORT_VAR", "8123").unwrap();
        assert_eq!(port, 8123);

        let result: Result<u16, _> = parse_env_or_default("HARBOR_TEST_UNSET_PORT_VAR", "nope");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_cache_defaults() {
        let cache = CacheConfig::default();
        assert_eq!(cache.sort_fetch_limit, 100);
        assert_eq!(cache.region_ttl, Duration::from_secs(3600));
    }
}
