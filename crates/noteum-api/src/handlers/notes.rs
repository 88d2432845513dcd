//! Note CRUD handlers. All operations act on the authenticated user's own
//! notes; anything else reads as 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use noteum_core::{CreateNoteRequest, ListNotesRequest, NoteRepository, UpdateNoteRequest};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::state::AppState;

pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListNotesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate limit before any database work.
    if let Some(limit) = query.limit {
        if limit <= 0 {
            return Err(ApiError::BadRequest("limit must be >= 1".into()));
        }
    }

    let response = state.db.notes.list(user.id, query).await?;
    Ok(Json(response))
}

pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note_id = state.db.notes.insert(user.id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": note_id })),
    ))
}

pub async fn get_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.fetch(user.id, id).await?;
    Ok(Json(note))
}

pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.notes.update_text(user.id, id, &body.text).await?;
    let note = state.db.notes.fetch(user.id, id).await?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.notes.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
