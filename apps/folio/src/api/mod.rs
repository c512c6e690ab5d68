//! # Folio HTTP API Module
//!
//! This module implements the reference collection server using axum.
//!
//! ## Endpoints
//!
//! - `GET /records?index=&size=` - One zero-based page of the collection
//! - `GET /status` - Collection size and paging limits
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `FOLIO_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `FOLIO_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `FOLIO_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{OPEN_PATHS, api_key_from_env, keys_match};
pub use handlers::{health_handler, records_handler, status_handler};
pub use middleware::{DEFAULT_RPS, RequestLimiter, rate_limit_from_env, request_limiter};
pub use types::{ErrorResponse, HealthResponse, PageQuery, StatusResponse};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use folio_core::{Collection, FolioError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the collection.
#[derive(Clone)]
pub struct AppState {
    pub collection: Arc<RwLock<Collection>>,
}

impl AppState {
    #[must_use]
    pub fn new(collection: Collection) -> Self {
        Self {
            collection: Arc::new(RwLock::new(collection)),
        }
    }
}

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Security settings of the server.
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Bearer key required on every endpoint but `/health`.
    pub api_key: Option<String>,
    /// Requests per second; 0 disables limiting.
    pub rate_limit: u32,
    /// Raw `FOLIO_CORS_ORIGINS` value.
    pub cors_origins: Option<String>,
}

impl ServerConfig {
    /// Read settings from `FOLIO_API_KEY`, `FOLIO_RATE_LIMIT` and
    /// `FOLIO_CORS_ORIGINS`.
    pub fn from_env() -> Self {
        Self {
            api_key: api_key_from_env(),
            rate_limit: rate_limit_from_env(),
            cors_origins: std::env::var("FOLIO_CORS_ORIGINS").ok(),
        }
    }

    /// Open settings: no auth, no rate limit, localhost CORS.
    pub fn open() -> Self {
        Self::default()
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (FOLIO_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in FOLIO_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => build_localhost_cors(),
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects against bursts (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/records", get(handlers::records_handler));

    match config.api_key.as_deref() {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            let key: Arc<str> = Arc::from(key);
            router = router.layer(axum_middleware::from_fn_with_state(
                key,
                auth::require_api_key,
            ));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - all endpoints are publicly accessible. \
                 Set FOLIO_API_KEY to enable authentication."
            );
        }
    }

    match request_limiter(config.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::throttle,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config.cors_origins.as_deref())),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until the process is stopped.
pub async fn run_server(
    addr: &str,
    collection: Collection,
    config: &ServerConfig,
) -> Result<(), FolioError> {
    let router = create_router(AppState::new(collection), config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| FolioError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Folio HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| FolioError::Io(format!("Server error: {}", e)))
}
