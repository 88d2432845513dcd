//! AI orchestration for the ask endpoints.
//!
//! This is the one place that talks to the chat backend. It gathers context
//! (one note, or the most recent notes), replays a bounded slice of
//! conversation history, runs a single chat completion under a hard
//! deadline, and persists the exchange for the per-note variant.
//!
//! Backend failures do not surface as HTTP errors: the endpoints answer with
//! a friendly fallback string instead, and fallback answers are never
//! written to the conversation history.

use std::time::{Duration, Instant};

use tracing::{info, warn};
use uuid::Uuid;

use noteum_core::defaults::{ASK_TIMEOUT_SECS, CONVERSATION_WINDOW, NOTE_CONTEXT_LIMIT};
use noteum_core::{
    ChatBackend, ChatMessage, ConversationRepository, Error, GenerationOptions, HistoryTurn,
    NoteRepository, Result,
};
use noteum_inference::{conversation_messages, cross_notes_system_prompt, single_note_system_prompt};

/// Answer when the completion exceeded its deadline.
pub const TIMEOUT_FALLBACK: &str =
    "The AI response took too long. Please try again with a simpler question.";

/// Answer when the backend failed for any other reason.
pub const ERROR_FALLBACK: &str =
    "An error occurred while processing your request. Please try again later.";

/// Answer when the backend returned an empty completion.
pub const EMPTY_COMPLETION_FALLBACK: &str = "A problem has occurred";

/// Answer for the cross-notes variant when the user has no notes at all.
pub const NO_NOTES_ANSWER: &str = "You don't have any notes yet.";

/// Outcome of one completion attempt.
enum Completion {
    /// A real assistant answer, safe to persist.
    Answer(String),
    /// A friendly substitute for a failed or empty completion.
    Fallback(&'static str),
}

/// Run one chat completion under the ask deadline. Dropping the future on
/// timeout cancels the in-flight HTTP request.
async fn run_completion(ai: &dyn ChatBackend, messages: &[ChatMessage]) -> Completion {
    let start = Instant::now();
    let opts = GenerationOptions::default();
    let deadline = Duration::from_secs(ASK_TIMEOUT_SECS);

    let outcome = match tokio::time::timeout(deadline, ai.chat(messages, &opts)).await {
        Err(_elapsed) => {
            warn!(
                subsystem = "api",
                component = "ask",
                model = ai.model_name(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Chat completion exceeded deadline, request cancelled"
            );
            Completion::Fallback(TIMEOUT_FALLBACK)
        }
        Ok(Err(Error::Timeout(msg))) => {
            warn!(
                subsystem = "api",
                component = "ask",
                error = %msg,
                "Chat completion timed out in transport"
            );
            Completion::Fallback(TIMEOUT_FALLBACK)
        }
        Ok(Err(err)) => {
            warn!(
                subsystem = "api",
                component = "ask",
                error = %err,
                "Chat completion failed"
            );
            Completion::Fallback(ERROR_FALLBACK)
        }
        Ok(Ok(text)) if text.trim().is_empty() => Completion::Fallback(EMPTY_COMPLETION_FALLBACK),
        Ok(Ok(text)) => Completion::Answer(text),
    };

    info!(
        subsystem = "api",
        component = "ask",
        op = "chat",
        model = ai.model_name(),
        duration_ms = start.elapsed().as_millis() as u64,
        success = matches!(&outcome, Completion::Answer(_)),
        "Chat completion finished"
    );
    outcome
}

/// Ask a question about one note, with persisted conversation history.
pub async fn ask_about_note(
    notes: &dyn NoteRepository,
    conversations: &dyn ConversationRepository,
    ai: &dyn ChatBackend,
    author_id: Uuid,
    note_id: Uuid,
    question: &str,
) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::InvalidInput("A question is required".to_string()));
    }

    let note = notes.fetch(author_id, note_id).await?;
    let history = conversations
        .recent_for_note(note_id, CONVERSATION_WINDOW as i64)
        .await?;

    let mut turns: Vec<HistoryTurn> = history.iter().map(HistoryTurn::from).collect();
    turns.push(HistoryTurn {
        question: question.to_string(),
        response: None,
    });

    let system = single_note_system_prompt(&note.text);
    let messages = conversation_messages(&system, &turns);

    info!(
        subsystem = "api",
        component = "ask",
        op = "ask_about_note",
        user_id = %author_id,
        note_id = %note_id,
        turn_count = turns.len(),
        prompt_len = system.len(),
        "Asking about note"
    );

    match run_completion(ai, &messages).await {
        Completion::Answer(answer) => {
            conversations.append(note_id, question, &answer).await?;
            Ok(answer)
        }
        Completion::Fallback(fallback) => Ok(fallback.to_string()),
    }
}

/// Ask a question across the user's most recent notes. History is held by
/// the client: `questions` includes the pending question as its last
/// element, `responses` may be one element shorter. Nothing is persisted.
pub async fn ask_about_notes(
    notes: &dyn NoteRepository,
    ai: &dyn ChatBackend,
    author_id: Uuid,
    questions: &[String],
    responses: &[String],
) -> Result<String> {
    let pending = questions.last().map(|q| q.trim()).unwrap_or_default();
    if pending.is_empty() {
        return Err(Error::InvalidInput("A question is required".to_string()));
    }

    let recent = notes.recent_for_author(author_id, NOTE_CONTEXT_LIMIT).await?;
    if recent.is_empty() {
        return Ok(NO_NOTES_ANSWER.to_string());
    }

    let turns: Vec<HistoryTurn> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| HistoryTurn {
            question: q.clone(),
            response: responses.get(i).cloned(),
        })
        .collect();

    let system = cross_notes_system_prompt(&recent);
    let messages = conversation_messages(&system, &turns);

    info!(
        subsystem = "api",
        component = "ask",
        op = "ask_about_notes",
        user_id = %author_id,
        note_count = recent.len(),
        turn_count = turns.len(),
        prompt_len = system.len(),
        "Asking across notes"
    );

    match run_completion(ai, &messages).await {
        Completion::Answer(answer) => Ok(answer),
        Completion::Fallback(fallback) => Ok(fallback.to_string()),
    }
}
