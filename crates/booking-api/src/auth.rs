//! # Requester Identity
//!
//! Authentication happens upstream; this extractor only reads the identity
//! the session layer attached to the request. A request without one still
//! reaches the handler so the Coordinator can report `Unauthenticated`.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use booking_core::Identity;
use std::convert::Infallible;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Identity of the caller, if the request carried one
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(identity_from_headers(&parts.headers)))
    }
}

/// Requires a bearer token and a user id; email is optional
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)?;

    let subject = header_str(headers, USER_ID_HEADER)?;
    let email = header_str(headers, USER_EMAIL_HEADER).unwrap_or_default();

    Some(Identity::new(subject, email, token))
}

fn bearer_token(value: &str) -> Option<String> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_full_identity() {
        let identity = identity_from_headers(&headers(&[
            ("authorization", "Bearer tok_alice"),
            ("x-user-id", "alice"),
            ("x-user-email", "alice@example.com"),
        ]))
        .unwrap();

        assert_eq!(identity, Identity::new("alice", "alice@example.com", "tok_alice"));
    }

    #[test]
    fn test_missing_parts() {
        assert!(identity_from_headers(&headers(&[("x-user-id", "alice")])).is_none());
        assert!(identity_from_headers(&headers(&[("authorization", "Bearer tok")])).is_none());
        assert!(identity_from_headers(&headers(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            ("x-user-id", "alice"),
        ]))
        .is_none());
        assert!(identity_from_headers(&headers(&[
            ("authorization", "Bearer "),
            ("x-user-id", "alice"),
        ]))
        .is_none());
    }

    #[test]
    fn test_email_optional() {
        let identity = identity_from_headers(&headers(&[
            ("authorization", "bearer tok"),
            ("x-user-id", "alice"),
        ]))
        .unwrap();
        assert_eq!(identity.email, "");
    }
}
