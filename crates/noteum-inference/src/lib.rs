//! # noteum-inference
//!
//! Chat-completion backend abstraction for noteum.
//!
//! This crate provides:
//! - The OpenAI-compatible HTTP backend used in production
//! - Prompt assembly for note Q&A (context formatting, history windowing)
//! - A deterministic mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable the mock backend
//!
//! # Example
//!
//! ```rust,no_run
//! use noteum_inference::{OpenAiBackend, OpenAiConfig};
//! use noteum_core::{ChatBackend, ChatMessage, GenerationOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAiBackend::from_env().unwrap();
//!     let messages = vec![ChatMessage::user("Summarize my day".to_string())];
//!     let reply = backend.chat(&messages, &GenerationOptions::default()).await.unwrap();
//!     println!("{reply}");
//! }
//! ```

pub mod openai;
pub mod prompt;

// Mock chat backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use noteum_core::*;

pub use openai::{OpenAiBackend, OpenAiConfig};
pub use prompt::{
    conversation_messages, cross_notes_system_prompt, format_notes_context,
    single_note_system_prompt, truncate_chars,
};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockChatBackend;
