//! Core data models for noteum.
//!
//! These types are shared across all noteum crates and represent the core
//! domain entities: users, sessions, notes, and per-note AI conversations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::{MIN_PASSWORD_LENGTH, PREVIEW_LENGTH};
use crate::{Error, Result};

// =============================================================================
// USER & SESSION TYPES
// =============================================================================

/// An account that owns notes and conversations.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// A stored session row. The opaque token itself is never persisted; only
/// its hash is.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at_utc: DateTime<Utc>,
    pub expires_at_utc: DateTime<Utc>,
}

/// The one-time result of opening a session: the cleartext token handed to
/// the client, plus its expiry.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at_utc: DateTime<Utc>,
}

/// Request to create a user account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A note. Text may be empty: the editor creates the row first and saves
/// content incrementally.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Lightweight note projection for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: Uuid,
    pub preview: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Derive a single-line preview from note text.
pub fn note_preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    first_line.chars().take(PREVIEW_LENGTH).collect()
}

/// Request to create a note. The client may supply the id so it can
/// navigate to the note before the round-trip completes.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub text: String,
}

/// Request to replace a note's text.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoteRequest {
    pub text: String,
}

/// Pagination parameters for listing notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotesRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of notes plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotesResponse {
    pub notes: Vec<NoteSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// =============================================================================
// CONVERSATION TYPES
// =============================================================================

/// One question/answer pair of a per-note AI conversation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatExchange {
    pub id: Uuid,
    pub note_id: Uuid,
    pub question: String,
    pub response: String,
    pub created_at_utc: DateTime<Utc>,
}

/// A conversation turn as replayed into a prompt. The pending (not yet
/// answered) question carries `response: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub question: String,
    pub response: Option<String>,
}

impl From<&ChatExchange> for HistoryTurn {
    fn from(exchange: &ChatExchange) -> Self {
        Self {
            question: exchange.question.clone(),
            response: Some(exchange.response.clone()),
        }
    }
}

// =============================================================================
// CHAT WIRE TYPES
// =============================================================================

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single chat message sent to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: Some(crate::defaults::GEN_TEMPERATURE),
            top_p: Some(crate::defaults::GEN_TOP_P),
            max_tokens: Some(crate::defaults::GEN_MAX_TOKENS),
        }
    }
}

// =============================================================================
// AUTH DTOs
// =============================================================================

/// Signup request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    /// Validate field shape before any database work.
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || email.len() > 254 {
            return Err(Error::InvalidInput("A valid email is required".into()));
        }
        let username = self.username.trim();
        if username.len() < 3 || username.len() > 32 {
            return Err(Error::InvalidInput(
                "Username must be between 3 and 32 characters".into(),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::InvalidInput(
                "Username may only contain letters, digits, '_' and '-'".into(),
            ));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful signup/login response: a session token plus the user.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at_utc: DateTime<Utc>,
    pub user: User,
}

// =============================================================================
// ASK DTOs
// =============================================================================

/// Per-note ask request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Ask response. `response` is HTML produced by the assistant, or one of the
/// friendly fallback strings when the backend failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

/// Cross-notes ask request. History is client-held: `questions` includes the
/// pending question as its last element; `responses` may be one shorter.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossAskRequest {
    pub questions: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

/// Conversation history for one note, in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub exchanges: Vec<ChatExchange>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_signup_validate_accepts_typical_input() {
        assert!(signup("ada@example.com", "ada_l", "correcthorse").validate().is_ok());
    }

    #[test]
    fn test_signup_validate_rejects_bad_email() {
        assert!(signup("not-an-email", "ada", "correcthorse").validate().is_err());
        assert!(signup("", "ada", "correcthorse").validate().is_err());
    }

    #[test]
    fn test_signup_validate_rejects_short_username() {
        assert!(signup("ada@example.com", "ab", "correcthorse").validate().is_err());
    }

    #[test]
    fn test_signup_validate_rejects_username_with_spaces() {
        assert!(signup("ada@example.com", "ada lovelace", "correcthorse")
            .validate()
            .is_err());
    }

    #[test]
    fn test_signup_validate_rejects_short_password() {
        assert!(signup("ada@example.com", "ada", "short").validate().is_err());
    }

    #[test]
    fn test_note_preview_takes_first_line() {
        assert_eq!(note_preview("first line\nsecond line"), "first line");
    }

    #[test]
    fn test_note_preview_truncates_long_lines() {
        let long = "x".repeat(500);
        assert_eq!(note_preview(&long).chars().count(), PREVIEW_LENGTH);
    }

    #[test]
    fn test_note_preview_empty_text() {
        assert_eq!(note_preview(""), "");
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::System).unwrap(), "\"system\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_chat_message_constructors() {
        let msg = ChatMessage::user("hello");
        assert_eq!(msg.role, ChatRole::User);
        assert_eq!(msg.content, "hello");
    }

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, Some(1.0));
        assert_eq!(opts.top_p, Some(1.0));
        assert_eq!(opts.max_tokens, Some(1000));
    }

    #[test]
    fn test_history_turn_from_exchange() {
        let exchange = ChatExchange {
            id: Uuid::nil(),
            note_id: Uuid::nil(),
            question: "q".to_string(),
            response: "r".to_string(),
            created_at_utc: Utc::now(),
        };
        let turn = HistoryTurn::from(&exchange);
        assert_eq!(turn.question, "q");
        assert_eq!(turn.response.as_deref(), Some("r"));
    }

    #[test]
    fn test_cross_ask_request_responses_default_empty() {
        let req: CrossAskRequest =
            serde_json::from_str(r#"{"questions": ["what did I write?"]}"#).unwrap();
        assert_eq!(req.questions.len(), 1);
        assert!(req.responses.is_empty());
    }

    #[test]
    fn test_create_note_request_text_defaults_empty() {
        let req: CreateNoteRequest = serde_json::from_str("{}").unwrap();
        assert!(req.id.is_none());
        assert_eq!(req.text, "");
    }
}
