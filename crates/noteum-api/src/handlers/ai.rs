//! Ask-AI and conversation history handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use noteum_core::{
    AskRequest, AskResponse, ConversationRepository, ConversationResponse, CrossAskRequest, Error,
    NoteRepository,
};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::services::ask;
use crate::state::AppState;

/// Ask a question about one note. The exchange is appended to the note's
/// conversation on success.
pub async fn ask_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = ask::ask_about_note(
        &state.db.notes,
        &state.db.conversations,
        state.ai.as_ref(),
        user.id,
        id,
        &body.question,
    )
    .await?;

    Ok(Json(AskResponse { response }))
}

/// Ask a question across the user's most recent notes, with client-held
/// history. Nothing is persisted.
pub async fn ask_notes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CrossAskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = ask::ask_about_notes(
        &state.db.notes,
        state.ai.as_ref(),
        user.id,
        &body.questions,
        &body.responses,
    )
    .await?;

    Ok(Json(AskResponse { response }))
}

/// A note's conversation history, oldest first.
pub async fn get_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.notes.exists(user.id, id).await? {
        return Err(Error::NoteNotFound(id).into());
    }

    let exchanges = state.db.conversations.list_for_note(id).await?;
    let count = exchanges.len();
    Ok(Json(ConversationResponse { exchanges, count }))
}

/// Clear a note's conversation history.
pub async fn clear_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.notes.exists(user.id, id).await? {
        return Err(Error::NoteNotFound(id).into());
    }

    let deleted = state.db.conversations.clear_for_note(id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
