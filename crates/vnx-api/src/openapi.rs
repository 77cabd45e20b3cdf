//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token issued by the hosted auth service.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VNX zkTLS Verification API",
        version = "0.1.0",
        description = "Verifies zkTLS proofs of TikTok and Instagram analytics, normalizes them into demographics, engagement rate and average views, and stores a 30-day verification record.\n\nAuthentication: `Authorization: Bearer <token>` on every `/v1/*` endpoint. Health probes, `/metrics` and this document are unauthenticated.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        crate::routes::verify::verify_proof,
        crate::routes::providers::list_providers,
        crate::routes::verifications::latest_verification,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::verify::VerifyProofRequest,
            crate::routes::verify::VerifyProofResponse,
            crate::routes::providers::ProviderInfo,
            crate::routes::providers::ProviderCatalog,
            crate::routes::verifications::VerificationStatus,
            crate::routes::verifications::VerificationStatusResponse,
            crate::db::VerificationRecord,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "zktls", description = "Proof verification and provider catalog"),
        (name = "verifications", description = "Stored verification lookups"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
