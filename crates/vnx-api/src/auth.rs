//! # Authentication Middleware
//!
//! Every `/v1` request must carry `Authorization: Bearer <token>`. The token
//! is resolved to a user by the hosted auth service through the
//! [`IdentityResolver`] seam, and the result is injected into request
//! extensions as an [`AuthenticatedUser`]. Handlers extract it via the
//! `FromRequestParts` impl.
//!
//! Health probes, `/metrics` and CORS preflights never reach this layer.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use uuid::Uuid;
use vnx_client::IdentityResolver;

use crate::error::AppError;

/// The caller, as resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// The user id as a UUID, when it is one.
    pub fn user_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.id).ok()
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and the token must be non-empty.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the bearer token and inject [`AuthenticatedUser`].
///
/// - missing header, wrong scheme, or a token the auth service rejects: 401
/// - auth service unreachable or misbehaving: 502
pub async fn auth_middleware(
    Extension(identity): Extension<Arc<dyn IdentityResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header_value) = header_value else {
        return AppError::Unauthorized("Missing authorization header".into()).into_response();
    };

    let Some(token) = bearer_token(header_value) else {
        return AppError::Unauthorized("Unauthorized".into()).into_response();
    };

    match identity.resolve(token).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.id, "caller authenticated");
            request.extensions_mut().insert(AuthenticatedUser {
                id: user.id,
                email: user.email,
            });
            next.run(request).await
        }
        Ok(None) => AppError::Unauthorized("Unauthorized".into()).into_response(),
        Err(e) => AppError::Upstream(format!("auth service: {e}")).into_response(),
    }
}
