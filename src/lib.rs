//! Multi-provider LLM client facade with local CLI adapters.
//!
//! This crate fronts two completion paths behind one client surface:
//!
//! - **Custom providers** that shell out to a locally installed AI CLI
//!   (currently the Claude Code CLI), parse its JSON output, and shape it
//!   into the standard completion-response form.
//! - **Standard providers** reached through an injected
//!   [`CompletionBackend`], which handles routing, retries, and cost
//!   accounting for hosted models.
//!
//! Shelling out to a CLI leverages the user's existing CLI authentication:
//! no API keys are stored or forwarded by this crate, and the cost of a
//! CLI completion is whatever the external tool reports, carried on the
//! response rather than recomputed from token counts.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use relay_llm::{ClaudeCodeAdapter, CompletionOptions, LlmClient, Message};
//!
//! let client = LlmClient::new(backend, vec![Arc::new(ClaudeCodeAdapter::new(None))]);
//!
//! let messages = vec![Message::user("What is Rust?")];
//! let response = client
//!     .complete("claudecode/opus", &messages, &CompletionOptions::default())
//!     .await?;
//!
//! println!("{} (${:.4})", response.content().unwrap_or(""), client.cost(&response));
//! ```

pub mod adapters;
pub mod client;
pub mod provider;
pub mod response;

// Re-export main types for convenience
pub use adapters::ClaudeCodeAdapter;
pub use client::{CompletionBackend, LlmClient};
pub use provider::{CompletionOptions, CustomProvider, LLMError, LLMResult, Message, Role};
pub use response::{CliPayload, CliUsage, ModelResponse, ResponseOrigin, ResponseUsage};
