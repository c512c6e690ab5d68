//! # API Key Gate
//!
//! When the server is started with a key (`FOLIO_API_KEY`), every route
//! outside [`OPEN_PATHS`] needs it in the `Authorization` header, either as
//! `Bearer <key>` or bare. Refusals are 401 with a JSON `ErrorResponse` and
//! `WWW-Authenticate: Bearer`.

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::{Choice, ConstantTimeEq};

/// Routes reachable without a key (load balancer health checks).
pub const OPEN_PATHS: &[&str] = &["/health"];

/// `FOLIO_API_KEY`, if set to something non-empty.
pub fn api_key_from_env() -> Option<String> {
    std::env::var("FOLIO_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}

/// Constant-time key comparison.
///
/// Runs over the longer of the two inputs, so neither content nor the
/// position of the first difference shows in the timing.
pub fn keys_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    let byte_at = |bytes: &[u8], i: usize| bytes.get(i).copied().unwrap_or(0);

    let mut same = Choice::from(1u8);
    for i in 0..presented.len().max(expected.len()) {
        same &= byte_at(presented, i).ct_eq(&byte_at(expected, i));
    }
    same &= (presented.len() as u64).ct_eq(&(expected.len() as u64));
    same.into()
}

/// Key carried by the `Authorization` header, with any `Bearer ` stripped.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(ErrorResponse::new("Unauthorized")),
    )
        .into_response()
}

pub async fn require_api_key(
    State(expected): State<Arc<str>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if OPEN_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let refusal = match presented_key(request.headers()) {
        Some(key) if keys_match(key, &expected) => None,
        Some(_) => Some("invalid_api_key"),
        None => Some("missing_authorization_header"),
    };
    let Some(reason) = refusal else {
        return next.run(request).await;
    };

    tracing::warn!(
        event = "auth_failure",
        reason,
        path = %request.uri().path(),
        "Request refused without a valid API key"
    );
    unauthorized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn identical_keys_match() {
        assert!(keys_match("folio-key", "folio-key"));
    }

    #[test]
    fn length_mismatch_never_matches() {
        assert!(!keys_match("folio", "folio-key"));
        assert!(!keys_match("folio-key-2", "folio-key"));
        assert!(!keys_match("", "folio-key"));
    }

    #[test]
    fn trailing_nul_does_not_pad_into_a_match() {
        assert!(!keys_match("folio-key\0", "folio-key"));
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(
            presented_key(&with_authorization("Bearer abc")),
            Some("abc")
        );
        assert_eq!(presented_key(&with_authorization("abc")), Some("abc"));
        assert_eq!(presented_key(&HeaderMap::new()), None);
    }
}
