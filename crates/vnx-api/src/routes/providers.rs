//! `GET /v1/zktls/providers`: the provider catalog clients pick from when
//! requesting a proof.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;
use vnx_core::Provider;

use crate::auth::AuthenticatedUser;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderInfo {
    pub id: String,
    pub provider_type: String,
    /// `tiktok` or `instagram`.
    pub platform: String,
    pub requires_content_id: bool,
}

impl From<Provider> for ProviderInfo {
    fn from(provider: Provider) -> Self {
        Self {
            id: provider.id().to_string(),
            provider_type: provider.provider_type().to_string(),
            platform: provider.platform().as_str().to_string(),
            requires_content_id: provider.requires_content_id(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderCatalog {
    pub providers: Vec<ProviderInfo>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/zktls/providers", get(list_providers))
}

/// GET /v1/zktls/providers: List supported proof providers.
#[utoipa::path(
    get,
    path = "/v1/zktls/providers",
    responses(
        (status = 200, description = "Supported providers", body = ProviderCatalog),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "zktls"
)]
async fn list_providers(_caller: AuthenticatedUser) -> Json<ProviderCatalog> {
    Json(ProviderCatalog {
        providers: Provider::ALL.into_iter().map(ProviderInfo::from).collect(),
    })
}
