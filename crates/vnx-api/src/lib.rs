//! # vnx-api: zkTLS Proof Verification Service
//!
//! Axum HTTP service that accepts zkTLS proofs of a creator's TikTok or
//! Instagram analytics, checks them with the external verifier, normalizes
//! them with `vnx-core` and stores an audit record that expires after 30
//! days.
//!
//! ## API Surface
//!
//! | Path                                     | Module                      |
//! |------------------------------------------|-----------------------------|
//! | `POST /v1/zktls/verify`                  | [`routes::verify`]          |
//! | `GET /v1/zktls/providers`                | [`routes::providers`]       |
//! | `GET /v1/social-accounts/:id/verification` | [`routes::verifications`] |
//! | `GET /health/liveness`, `/health/readiness` | this module              |
//! | `GET /metrics`                           | this module                 |
//! | `GET /openapi.json`                      | [`openapi`]                 |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CORS → TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! CORS preflights are answered by the outermost layer. Any other `OPTIONS`
//! request gets an empty 200 just inside it. Neither reaches
//! authentication.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Request headers browsers may send cross-origin.
const CORS_ALLOWED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    header::CONTENT_TYPE,
];

/// CORS policy: any origin, the three methods the API uses, and the
/// headers the web client sends.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(CORS_ALLOWED_HEADERS)
}

/// Assemble the full application router with all routes and middleware.
///
/// Health probes, `/metrics` and `/openapi.json` are mounted outside the
/// auth middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let metrics_on = state.config.metrics_enabled;

    // Proofs are small JSON documents; 2 MiB is generous.
    let mut api = Router::new()
        .merge(routes::verify::router())
        .merge(routes::providers::router())
        .merge(routes::verifications::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(from_fn(auth::auth_middleware));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(state.metrics.clone()));
    }

    let api = api
        .layer(Extension(state.identity.clone()))
        .layer(middleware::tracing_layer::layer())
        .with_state(state.clone());

    let mut unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .merge(openapi::router());

    if metrics_on {
        unauthenticated =
            unauthenticated.route("/metrics", axum::routing::get(prometheus_metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new()
        .merge(unauthenticated)
        .merge(api)
        .layer(from_fn(answer_options))
        .layer(cors_layer())
}

/// Answer any `OPTIONS` request that is not a full CORS preflight with an
/// empty 200, so it never reaches authentication.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

/// GET /metrics: Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" when storage answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.repository.ping().await {
        tracing::warn!("Database health check failed: {e}");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}
