//! # Request Throttling
//!
//! One token bucket shared by every route. A rejected request gets 429
//! with a JSON `ErrorResponse` and a `Retry-After` hint in whole seconds.
//!
//! `FOLIO_RATE_LIMIT` sets the refill rate per second (default 100); `0`
//! turns throttling off.

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Refill rate used when `FOLIO_RATE_LIMIT` is unset or unparsable.
pub const DEFAULT_RPS: u32 = 100;

/// Bucket shared by all routes of one server.
pub type RequestLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Bucket refilling `per_second` tokens a second; `None` for zero.
pub fn request_limiter(per_second: u32) -> Option<RequestLimiter> {
    NonZeroU32::new(per_second)
        .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))))
}

pub fn rate_limit_from_env() -> u32 {
    std::env::var("FOLIO_RATE_LIMIT")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_RPS)
}

/// Whole seconds to advertise in `Retry-After`, never below one.
fn retry_after_secs(wait: Duration) -> u64 {
    let rounded_up = wait
        .as_secs()
        .saturating_add(u64::from(wait.subsec_nanos() > 0));
    rounded_up.max(1)
}

pub async fn throttle(
    State(limiter): State<RequestLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Err(not_until) = limiter.check() else {
        return next.run(request).await;
    };

    let wait = not_until.wait_time_from(DefaultClock::default().now());
    let secs = retry_after_secs(wait);
    tracing::warn!(
        event = "rate_limited",
        path = %request.uri().path(),
        retry_after = secs,
        "Request throttled"
    );

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ErrorResponse::new("Too many requests")),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    response
}
