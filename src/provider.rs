//! Provider trait, request types, and error type.
//!
//! This module defines the seam between the client facade and custom
//! providers that shell out to local AI CLIs rather than making direct
//! API calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::response::ModelResponse;

/// Default timeout for a completion call: 30 minutes.
///
/// Local CLI backends can run agentic multi-step sessions, so the default
/// is far more generous than a typical HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A completion failure.
///
/// All failure paths at this layer collapse into one message-carrying kind:
/// missing executable, timeout, non-zero process exit (message includes the
/// captured stderr), and anything else that goes wrong mid-call. Callers
/// distinguish causes only by inspecting the message text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LLMError {
    message: String,
}

impl LLMError {
    /// Create an error from a descriptive message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for completion operations.
pub type LLMResult<T> = Result<T, LLMError>;

/// Role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt setting context and instructions.
    System,
    /// User/human message.
    User,
    /// Assistant/LLM message.
    Assistant,
}

/// A message in a conversation.
///
/// Serializes to the `{"role": ..., "content": ...}` shape shared by the
/// standard chat-completion APIs; the full message list is what gets
/// JSON-encoded into the CLI prompt argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Options recognized by completion calls.
///
/// `timeout` is currently the only recognized option; unknown options from
/// the original surface are dropped rather than carried around.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Upper bound on how long to wait for the backing process or service.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CompletionOptions {
    /// Create options with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Trait for custom completion providers.
///
/// Implementations shell out to a local AI CLI rather than making direct
/// API calls. This leverages the user's existing CLI authentication and
/// avoids storing API keys in configuration.
///
/// # Example
///
/// ```rust,ignore
/// use relay_llm::provider::{CompletionOptions, CustomProvider, LLMResult, Message};
///
/// async fn example(provider: &dyn CustomProvider) -> LLMResult<String> {
///     let messages = vec![Message::user("What is the capital of France?")];
///     let response = provider
///         .completion("opus", &messages, &CompletionOptions::default())
///         .await?;
///     Ok(response.choices[0].message.content.clone())
/// }
/// ```
#[async_trait]
pub trait CustomProvider: Send + Sync {
    /// Get the provider name, used as the model identifier's scheme
    /// (e.g. "claudecode" in `claudecode/opus`).
    fn name(&self) -> &str;

    /// Check if the backing CLI is available in the system PATH.
    ///
    /// This checks whether the command can be executed, not whether
    /// authentication is valid.
    async fn is_available(&self) -> bool;

    /// Run one completion request against the backing CLI.
    ///
    /// # Arguments
    /// * `model` - Backend model identifier, with the provider scheme
    ///   already stripped
    /// * `messages` - Ordered conversation messages
    /// * `options` - Per-call options (timeout)
    ///
    /// # Errors
    /// Returns an error if the CLI is missing, times out, exits non-zero,
    /// or its output cannot be decoded.
    async fn completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> LLMResult<ModelResponse>;
}
