//! Prompt assembly for note Q&A.
//!
//! Pure functions; everything that bounds the prompt lives here. The context
//! budget is fixed: at most `NOTE_CONTEXT_LIMIT` notes of at most
//! `NOTE_CONTEXT_TRUNCATE` chars each, and at most `CONVERSATION_WINDOW`
//! replayed turns (the pending question counts as a turn).

use noteum_core::defaults::{CONVERSATION_WINDOW, NOTE_CONTEXT_TRUNCATE, SINGLE_NOTE_TRUNCATE};
use noteum_core::{ChatMessage, HistoryTurn, Note};

/// Shared assistant instructions. Answers are rendered as HTML by the client,
/// so the output contract is part of the prompt.
const FORMAT_INSTRUCTIONS: &str = "\
Make sure that your answers are not too verbose and you speak succinctly.
Your responses MUST be formatted in clean, valid HTML with proper structure.
Use tags like <p>, <strong>, <em>, <ul>, <ol>, <li>, <h1> to <h6>, and <br> when appropriate.
Do NOT wrap the entire response in a single <p> tag unless it's a single paragraph.
Avoid inline styles, JavaScript, or custom attributes.";

/// Truncate `text` to at most `max` characters, never splitting a code
/// point, appending `"..."` only when something was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Format a set of notes into the context block embedded in the cross-notes
/// system prompt. Each note contributes its (truncated) text plus creation
/// and last-update timestamps.
pub fn format_notes_context(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|note| {
            format!(
                "Text: {}\nCreated at: {}\nLast updated: {}",
                truncate_chars(&note.text, NOTE_CONTEXT_TRUNCATE),
                note.created_at_utc.format("%Y-%m-%d %H:%M UTC"),
                note.updated_at_utc.format("%Y-%m-%d %H:%M UTC"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// System prompt for questions asked across all of a user's notes.
pub fn cross_notes_system_prompt(notes: &[Note]) -> String {
    format!(
        "You are a helpful assistant that answers questions about a user's notes.\n\
         Assume all questions are related to the user's notes.\n\
         {}\n\n\
         Here are the user's notes:\n{}",
        FORMAT_INSTRUCTIONS,
        format_notes_context(notes)
    )
}

/// System prompt for questions asked about one specific note.
pub fn single_note_system_prompt(note_text: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions about one of a user's notes.\n\
         Assume all questions are related to this note.\n\
         {}\n\n\
         Here is the note's content:\n{}",
        FORMAT_INSTRUCTIONS,
        truncate_chars(note_text, SINGLE_NOTE_TRUNCATE)
    )
}

/// Assemble the message list for one chat completion: the system prompt,
/// then the last `CONVERSATION_WINDOW` turns as alternating user/assistant
/// messages, oldest first. The pending question is the final turn and
/// carries no assistant reply.
pub fn conversation_messages(system: &str, turns: &[HistoryTurn]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system)];

    let start = turns.len().saturating_sub(CONVERSATION_WINDOW);
    for turn in &turns[start..] {
        messages.push(ChatMessage::user(turn.question.clone()));
        if let Some(response) = &turn.response {
            messages.push(ChatMessage::assistant(response.clone()));
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use noteum_core::ChatRole;
    use uuid::Uuid;

    fn note(text: &str) -> Note {
        Note {
            id: Uuid::nil(),
            author_id: Uuid::nil(),
            text: text.to_string(),
            created_at_utc: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            updated_at_utc: Utc.with_ymd_and_hms(2026, 3, 2, 18, 0, 0).unwrap(),
        }
    }

    fn answered(q: &str, r: &str) -> HistoryTurn {
        HistoryTurn {
            question: q.to_string(),
            response: Some(r.to_string()),
        }
    }

    fn pending(q: &str) -> HistoryTurn {
        HistoryTurn {
            question: q.to_string(),
            response: None,
        }
    }

    #[test]
    fn test_truncate_short_text_is_verbatim() {
        assert_eq!(truncate_chars("short", 1000), "short");
    }

    #[test]
    fn test_truncate_exact_length_has_no_ellipsis() {
        let text = "x".repeat(1000);
        assert_eq!(truncate_chars(&text, 1000), text);
    }

    #[test]
    fn test_truncate_long_text_appends_ellipsis() {
        let text = "x".repeat(1001);
        let truncated = truncate_chars(&text, 1000);
        assert_eq!(truncated.chars().count(), 1003);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // 4 multibyte chars; a byte-indexed cut at 3 would split a code point.
        let text = "日本語版";
        assert_eq!(truncate_chars(text, 3), "日本語...");
        assert_eq!(truncate_chars(text, 4), "日本語版");
    }

    #[test]
    fn test_format_notes_context_includes_timestamps() {
        let context = format_notes_context(&[note("groceries: eggs, milk")]);
        assert!(context.contains("Text: groceries: eggs, milk"));
        assert!(context.contains("Created at: 2026-03-01 09:30 UTC"));
        assert!(context.contains("Last updated: 2026-03-02 18:00 UTC"));
    }

    #[test]
    fn test_format_notes_context_truncates_each_note() {
        let long = "y".repeat(2000);
        let context = format_notes_context(&[note(&long)]);
        assert!(context.contains(&format!("{}...", "y".repeat(1000))));
        assert!(!context.contains(&"y".repeat(1001)));
    }

    #[test]
    fn test_format_notes_context_empty() {
        assert_eq!(format_notes_context(&[]), "");
    }

    #[test]
    fn test_cross_notes_prompt_embeds_context() {
        let prompt = cross_notes_system_prompt(&[note("alpha"), note("beta")]);
        assert!(prompt.contains("Here are the user's notes:"));
        assert!(prompt.contains("Text: alpha"));
        assert!(prompt.contains("Text: beta"));
        assert!(prompt.contains("valid HTML"));
    }

    #[test]
    fn test_single_note_prompt_embeds_text() {
        let prompt = single_note_system_prompt("meeting notes from tuesday");
        assert!(prompt.contains("Here is the note's content:"));
        assert!(prompt.contains("meeting notes from tuesday"));
        assert!(prompt.contains("related to this note"));
    }

    #[test]
    fn test_conversation_messages_structure() {
        let turns = vec![answered("q1", "r1"), pending("q2")];
        let messages = conversation_messages("sys", &turns);

        let roles: Vec<ChatRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User
            ]
        );
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[3].content, "q2");
    }

    #[test]
    fn test_conversation_messages_window_drops_oldest() {
        let turns = vec![
            answered("q1", "r1"),
            answered("q2", "r2"),
            answered("q3", "r3"),
            pending("q4"),
        ];
        let messages = conversation_messages("sys", &turns);

        // Window of 3 turns: q2/r2, q3/r3, q4. q1 falls off.
        assert!(!messages.iter().any(|m| m.content == "q1"));
        assert_eq!(messages[1].content, "q2");
        assert_eq!(messages.last().unwrap().content, "q4");
        assert_eq!(messages.len(), 1 + 2 + 2 + 1);
    }

    #[test]
    fn test_conversation_messages_only_pending_question() {
        let messages = conversation_messages("sys", &[pending("first question")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "first question");
    }

    #[test]
    fn test_conversation_messages_ends_with_user_turn() {
        // Even with a full history, the last message must be the pending
        // question for the completion to answer it.
        let turns = vec![
            answered("a", "b"),
            answered("c", "d"),
            answered("e", "f"),
            answered("g", "h"),
            pending("tail"),
        ];
        let messages = conversation_messages("sys", &turns);
        let last = messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, "tail");
    }
}
