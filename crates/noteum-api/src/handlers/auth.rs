//! Authentication handlers: signup, login, logout, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use noteum_core::{
    AuthResponse, CreateUserRequest, LoginRequest, SessionRepository, SignupRequest,
    UserRepository,
};

use crate::error::ApiError;
use crate::extract::{AuthSession, AuthUser};
use crate::state::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;

    // Friendly availability checks up front; the unique constraints still
    // guard the race window (mapped to the same messages in ApiError).
    if state.db.users.username_taken(&body.username).await? {
        return Err(ApiError::Conflict("Username is already taken".to_string()));
    }
    if state.db.users.email_taken(&body.email).await? {
        return Err(ApiError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let user = state
        .db
        .users
        .create(CreateUserRequest {
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await?;

    let session = state.db.sessions.create(user.id).await?;

    info!(
        subsystem = "api",
        component = "auth",
        op = "signup",
        user_id = %user.id,
        "Account created"
    );

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.token,
            expires_at_utc: session.expires_at_utc,
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users
        .verify_password(&body.email, &body.password)
        .await?;
    let session = state.db.sessions.create(user.id).await?;

    info!(
        subsystem = "api",
        component = "auth",
        op = "login",
        user_id = %user.id,
        "Session opened"
    );

    Ok(Json(AuthResponse {
        token: session.token,
        expires_at_utc: session.expires_at_utc,
        user,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    state.db.sessions.revoke(&session.token).await?;

    info!(
        subsystem = "api",
        component = "auth",
        op = "logout",
        user_id = %session.user.id,
        "Session revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(user)
}
