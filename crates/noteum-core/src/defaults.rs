//! Centralized default constants for the noteum system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// AI CONTEXT ASSEMBLY
// =============================================================================

/// Maximum number of recent notes embedded into a cross-notes prompt.
pub const NOTE_CONTEXT_LIMIT: i64 = 10;

/// Maximum characters of one note's text quoted into a cross-notes prompt.
/// Longer text is truncated on a char boundary and marked with "...".
pub const NOTE_CONTEXT_TRUNCATE: usize = 1000;

/// Maximum characters of the note's text in a single-note prompt. Larger
/// than the cross-notes budget: the whole prompt is about this one note.
pub const SINGLE_NOTE_TRUNCATE: usize = 8000;

/// Maximum conversation turns replayed into a prompt, counting the pending
/// (unanswered) question as one turn.
pub const CONVERSATION_WINDOW: usize = 3;

// =============================================================================
// GENERATION
// =============================================================================

/// End-to-end deadline for one chat-completion call.
pub const ASK_TIMEOUT_SECS: u64 = 15;

/// Completion token cap. Kept low so answers arrive within the ask deadline.
pub const GEN_MAX_TOKENS: u32 = 1000;

/// Sampling temperature for note Q&A.
pub const GEN_TEMPERATURE: f32 = 1.0;

/// Nucleus sampling parameter for note Q&A.
pub const GEN_TOP_P: f32 = 1.0;

// =============================================================================
// SESSIONS
// =============================================================================

/// Session lifetime in hours (fixed expiry, no sliding extension).
pub const SESSION_LIFETIME_HOURS: i64 = 24 * 7;

/// Length of the opaque session token (alphanumeric chars).
pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for note list endpoints.
pub const PAGE_LIMIT: i64 = 50;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

/// Maximum characters of note text included in a list preview.
pub const PREVIEW_LENGTH: usize = 200;
