//! Streamed chat completions, assembled into a single answer.
//!
//! A [`ChatClient`] posts one request to an OpenAI-compatible
//! chat-completions endpoint, reads the server-sent-event body line by line
//! and concatenates the delta fragments until the `[DONE]` sentinel.

pub mod aggregator;
pub mod chunk;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod line_stream;
pub mod provider;
pub mod types;

// Re-export core types for easy usage
pub use aggregator::{aggregate_lines, Aggregator, Termination};
pub use chunk::LineOutcome;
pub use client::ChatClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use conversation::Conversation;
pub use error::Error;
pub use provider::ChatCompletion;
pub use types::*;
