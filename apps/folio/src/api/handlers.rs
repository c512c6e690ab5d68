//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{ErrorResponse, HealthResponse, PageQuery, StatusResponse},
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get collection status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let collection = state.collection.read().await;
    (
        StatusCode::OK,
        Json(StatusResponse::for_count(collection.len())),
    )
}

// =============================================================================
// RECORDS HANDLER
// =============================================================================

/// Serve one page of the collection.
///
/// Malformed or out-of-range parameters answer 400 with an `ErrorResponse`.
pub async fn records_handler(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "Invalid page parameters: {}",
                    rejection.body_text()
                ))),
            )
                .into_response();
        }
    };

    let request = match query.to_request() {
        Ok(r) => r,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
                .into_response();
        }
    };

    let collection = state.collection.read().await;
    let page = collection.page(&request);
    tracing::debug!(
        index = request.index,
        size = request.size,
        returned = page.len(),
        "Serving page"
    );

    (StatusCode::OK, Json(page)).into_response()
}
