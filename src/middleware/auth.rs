//! Authentication middleware
//!
//! Extractors that verify the `Authorization: Bearer` access token and
//! hand handlers the caller's identity.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::handlers::ApiError;
use crate::services::AuthContext;
use crate::state::AppState;
use crate::utils::errors::EventBuddyError;

/// Bearer token from the request headers, if any
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// A verified caller; rejects the request with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.user_id
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(EventBuddyError::Unauthorized)?;
        match state.services.auth_service.verify_token(token) {
            Ok(context) => {
                debug!(user_id = %context.user_id, "Request authenticated");
                Ok(AuthUser(context))
            }
            Err(e) => {
                warn!(error = %e, path = %parts.uri.path(), "Rejected access token");
                Err(e.into())
            }
        }
    }
}

/// The caller when a valid token is present; anonymous otherwise
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthContext>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|c| c.user_id)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A bad token on a public page is treated as anonymous
        let context = bearer_token(parts).and_then(|token| state.services.auth_service.verify_token(token).ok());
        Ok(MaybeAuthUser(context))
    }
}
