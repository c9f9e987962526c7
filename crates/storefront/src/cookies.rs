//! Cookies correlating a browser with its backend session.
//!
//! | Cookie | Holds |
//! |--------|-------|
//! | `_harbor_jwt` | customer auth token, sent to the backend as a bearer token |
//! | `_harbor_cart_id` | backend cart ID |
//! | `_harbor_cache_id` | per-browser namespace ID recorded on request spans |
//!
//! All cookies are HTTP-only, `SameSite=Strict`, scoped to `/` and live for
//! seven days. `Secure` follows `STOREFRONT_SECURE_COOKIES`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use harbor_core::CartId;
use uuid::Uuid;

use crate::backend::AuthToken;

pub const AUTH_TOKEN_COOKIE: &str = "_harbor_jwt";
pub const CART_ID_COOKIE: &str = "_harbor_cart_id";
pub const CACHE_ID_COOKIE: &str = "_harbor_cache_id";

const COOKIE_MAX_AGE_DAYS: i64 = 7;

/// Attributes shared by every storefront cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    pub secure: bool,
}

/// Auth token from the request, if present and non-empty.
#[must_use]
pub fn auth_token(jar: &CookieJar) -> Option<AuthToken> {
    read(jar, AUTH_TOKEN_COOKIE).map(AuthToken::new)
}

#[must_use]
pub fn set_auth_token(jar: CookieJar, token: &AuthToken, settings: CookieSettings) -> CookieJar {
    jar.add(build(AUTH_TOKEN_COOKIE, token.expose().to_string(), settings))
}

#[must_use]
pub fn remove_auth_token(jar: CookieJar) -> CookieJar {
    remove(jar, AUTH_TOKEN_COOKIE)
}

/// Cart ID from the request, if present and non-empty.
#[must_use]
pub fn cart_id(jar: &CookieJar) -> Option<CartId> {
    read(jar, CART_ID_COOKIE).map(CartId::new)
}

#[must_use]
pub fn set_cart_id(jar: CookieJar, cart_id: &CartId, settings: CookieSettings) -> CookieJar {
    jar.add(build(CART_ID_COOKIE, cart_id.to_string(), settings))
}

#[must_use]
pub fn remove_cart_id(jar: CookieJar) -> CookieJar {
    remove(jar, CART_ID_COOKIE)
}

/// Cache namespace ID, creating and setting one when absent.
#[must_use]
pub fn cache_id(jar: CookieJar, settings: CookieSettings) -> (CookieJar, String) {
    if let Some(id) = read(&jar, CACHE_ID_COOKIE) {
        return (jar, id);
    }

    let id = Uuid::new_v4().to_string();
    let jar = jar.add(build(CACHE_ID_COOKIE, id.clone(), settings));
    (jar, id)
}

fn read(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn build(name: &'static str, value: String, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(settings.secure)
        .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
        .build()
}

fn remove(jar: CookieJar, name: &'static str) -> CookieJar {
    jar.remove(Cookie::build(name).path("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SETTINGS: CookieSettings = CookieSettings { secure: true };

    #[test]
    fn test_cart_id_round_trip_attributes() {
        let jar = set_cart_id(CookieJar::new(), &CartId::new("cart_1"), SETTINGS);
        let cookie = jar.get(CART_ID_COOKIE).unwrap();

        assert_eq!(cookie.value(), "cart_1");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cart_id(&jar), Some(CartId::new("cart_1")));
    }

    #[test]
    fn test_blank_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(CART_ID_COOKIE, "  "));
        assert_eq!(cart_id(&jar), None);
    }

    #[test]
    fn test_remove_cart_id() {
        let jar = set_cart_id(CookieJar::new(), &CartId::new("cart_1"), SETTINGS);
        let jar = remove_cart_id(jar);
        assert_eq!(cart_id(&jar), None);
    }

    #[test]
    fn test_auth_token_round_trip() {
        let jar = set_auth_token(CookieJar::new(), &AuthToken::new("jwt-value"), SETTINGS);
        assert_eq!(auth_token(&jar).unwrap().expose(), "jwt-value");

        let jar = remove_auth_token(jar);
        assert!(auth_token(&jar).is_none());
    }

    #[test]
    fn test_cache_id_is_created_once() {
        let (jar, first) = cache_id(CookieJar::new(), SETTINGS);
        assert!(Uuid::parse_str(&first).is_ok());

        let (_, second) = cache_id(jar, SETTINGS);
        assert_eq!(first, second);
    }
}
