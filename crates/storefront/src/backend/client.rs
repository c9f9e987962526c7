//! HTTP transport for the store API.

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{BackendError, Query};
use crate::config::BackendConfig;

/// Header carrying the publishable API key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Maximum number of body characters kept in logs and error messages.
const BODY_PREVIEW_CHARS: usize = 500;

/// Customer session token, sent as a bearer token.
///
/// Implements `Debug` manually to keep the token out of logs.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header or the auth cookie.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Client for the commerce store API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    publishable_key: String,
}

/// Error body returned by the store API.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl BackendClient {
    /// Create a new store API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                publishable_key: config.publishable_key.clone(),
            }),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the URL for `segments` under the base URL and attach `query`.
    ///
    /// Each segment is percent-encoded on its own, so IDs containing `/`, `?`
    /// or `#` stay inside their segment.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment is empty, `.` or `..`, or if the base URL
    /// cannot carry a path.
    pub fn url(&self, segments: &[&str], query: &Query) -> Result<Url, BackendError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(BackendError::InvalidSegment((*bad).to_string()));
        }

        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        query.apply(&mut url);
        Ok(url)
    }

    /// Issue a `GET` request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not the expected JSON.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &Query,
        auth: Option<&AuthToken>,
    ) -> Result<T, BackendError> {
        let url = self.url(segments, query)?;
        let request = self.request(Method::GET, url, auth);
        self.execute(request, &segments.join("/")).await
    }

    /// Issue a `POST` request with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn post<B, T>(
        &self,
        segments: &[&str],
        query: &Query,
        body: &B,
        auth: Option<&AuthToken>,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments, query)?;
        let request = self.request(Method::POST, url, auth).json(body);
        self.execute(request, &segments.join("/")).await
    }

    /// Issue a `DELETE` request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        auth: Option<&AuthToken>,
    ) -> Result<T, BackendError> {
        let url = self.url(segments, &Query::new())?;
        let request = self.request(Method::DELETE, url, auth);
        self.execute(request, &segments.join("/")).await
    }

    fn request(&self, method: Method, url: Url, auth: Option<&AuthToken>) -> reqwest::RequestBuilder {
        let request = self
            .inner
            .client
            .request(method, url)
            .header(PUBLISHABLE_KEY_HEADER, &self.inner.publishable_key);

        match auth {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(path, "Backend returned 404");
            let message = error_message(&response_text);
            return Err(BackendError::NotFound(message));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %preview(&response_text),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %preview(&response_text),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }
}

/// Extract the backend's `message` field, falling back to a body preview.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| preview(body))
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
