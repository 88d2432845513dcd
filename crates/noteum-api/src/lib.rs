//! # noteum-api
//!
//! HTTP API server for noteum: session auth, note CRUD, and AI question
//! answering over note content with per-note conversation history.
//!
//! The binary entry point lives in `main.rs`; this library exposes the
//! handler, service, and state modules so orchestration logic can be tested
//! directly.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
