//! Request extractors for authenticated endpoints.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use noteum_core::{SessionRepository, User};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user plus the bearer token that authenticated them
/// (needed by logout to revoke the presented session).
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// The authenticated user, for handlers that don't care about the token.
pub struct AuthUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("You must be logged in".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();
        let user = state.db.sessions.validate(&token).await?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;
        Ok(AuthUser(session.user))
    }
}
