//! Repository and backend trait definitions.
//!
//! The database crate provides PostgreSQL implementations of the repository
//! traits; the inference crate provides `ChatBackend` implementations. The
//! API layer programs against these traits so orchestration logic can be
//! tested with in-memory fakes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    ChatExchange, ChatMessage, CreateNoteRequest, CreateUserRequest, GenerationOptions,
    IssuedSession, ListNotesRequest, ListNotesResponse, Note, User,
};
use crate::Result;

/// Repository trait for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user account. The password is hashed before storage.
    async fn create(&self, req: CreateUserRequest) -> Result<User>;

    /// Fetch a user by id.
    async fn fetch(&self, id: Uuid) -> Result<User>;

    /// Look up a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Whether an account already uses this email.
    async fn email_taken(&self, email: &str) -> Result<bool>;

    /// Whether an account already uses this username.
    async fn username_taken(&self, username: &str) -> Result<bool>;

    /// Verify credentials. Returns a uniform `Unauthorized` error whether the
    /// email is unknown or the password is wrong.
    async fn verify_password(&self, email: &str, password: &str) -> Result<User>;
}

/// Repository trait for opaque-token sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open a session for a user. The cleartext token is returned exactly
    /// once; only its hash is stored.
    async fn create(&self, user_id: Uuid) -> Result<IssuedSession>;

    /// Resolve a token to its user. Expired tokens behave like unknown ones.
    async fn validate(&self, token: &str) -> Result<User>;

    /// Revoke a session by token. Returns whether a session was removed.
    async fn revoke(&self, token: &str) -> Result<bool>;

    /// Delete all expired sessions, returning how many were removed.
    async fn cleanup_expired(&self) -> Result<u64>;
}

/// Repository trait for notes. Every operation is author-scoped: acting on
/// another user's note is indistinguishable from a missing note.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note, honoring a client-supplied id when present.
    async fn insert(&self, author_id: Uuid, req: CreateNoteRequest) -> Result<Uuid>;

    /// Fetch one of the author's notes.
    async fn fetch(&self, author_id: Uuid, id: Uuid) -> Result<Note>;

    /// Replace a note's text, bumping its updated timestamp.
    async fn update_text(&self, author_id: Uuid, id: Uuid, text: &str) -> Result<()>;

    /// Delete one of the author's notes.
    async fn delete(&self, author_id: Uuid, id: Uuid) -> Result<()>;

    /// List the author's notes, newest first, paginated.
    async fn list(&self, author_id: Uuid, req: ListNotesRequest) -> Result<ListNotesResponse>;

    /// The author's most recently created notes, newest first. Used to build
    /// the cross-notes prompt context.
    async fn recent_for_author(&self, author_id: Uuid, limit: i64) -> Result<Vec<Note>>;

    /// Whether the author owns a note with this id.
    async fn exists(&self, author_id: Uuid, id: Uuid) -> Result<bool>;
}

/// Repository trait for per-note conversation history.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Append one question/answer exchange.
    async fn append(&self, note_id: Uuid, question: &str, response: &str) -> Result<Uuid>;

    /// All exchanges for a note, in creation order (oldest first).
    async fn list_for_note(&self, note_id: Uuid) -> Result<Vec<ChatExchange>>;

    /// The most recent `limit` exchanges, re-sorted oldest first so a prompt
    /// replays them chronologically.
    async fn recent_for_note(&self, note_id: Uuid, limit: i64) -> Result<Vec<ChatExchange>>;

    /// Delete a note's conversation, returning how many exchanges were removed.
    async fn clear_for_note(&self, note_id: Uuid) -> Result<u64>;

    /// Number of exchanges recorded for a note.
    async fn count_for_note(&self, note_id: Uuid) -> Result<i64>;
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one chat completion over the given messages and return the
    /// assistant's reply text.
    async fn chat(&self, messages: &[ChatMessage], opts: &GenerationOptions) -> Result<String>;

    /// The model this backend generates with.
    fn model_name(&self) -> &str;
}
