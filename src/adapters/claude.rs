//! Claude Code CLI adapter.
//!
//! This adapter shells out to the `claude` CLI tool to run one completion
//! per invocation. The conversation is JSON-encoded into the prompt
//! argument and the CLI is asked for JSON output, which carries the result
//! text, token usage, and the cost the tool computed itself.
//!
//! # Requirements
//!
//! The `claude` CLI must be installed and available in PATH.
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_llm::adapters::claude::ClaudeCodeAdapter;
//! use relay_llm::provider::{CompletionOptions, CustomProvider, Message};
//!
//! let adapter = ClaudeCodeAdapter::new(None);
//!
//! if adapter.is_available().await {
//!     let messages = vec![Message::user("What is the capital of France?")];
//!     let response = adapter
//!         .completion("opus", &messages, &CompletionOptions::default())
//!         .await?;
//! }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use uuid::Uuid;

use crate::provider::{CompletionOptions, CustomProvider, LLMError, LLMResult, Message, Role};
use crate::response::{Choice, ChoiceMessage, CliPayload, ModelResponse, ResponseOrigin};

/// Provider name, used as the model identifier scheme for dispatch and as
/// the response id prefix.
pub const PROVIDER_NAME: &str = "claudecode";

/// Adapter for the Claude Code CLI.
///
/// Invokes `<cli> --model=<model> -p <json messages> --output-format=json`
/// with stdin closed and the parent environment forwarded unchanged. One
/// child process per call; no retries, no caching.
#[derive(Debug, Clone)]
pub struct ClaudeCodeAdapter {
    /// CLI command name or full path to executable.
    cli_command: String,
}

impl ClaudeCodeAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `cli_path` - Optional custom path to the `claude` CLI.
    ///   If `None`, uses "claude" (must be in PATH).
    pub fn new(cli_path: Option<String>) -> Self {
        Self {
            cli_command: cli_path.unwrap_or_else(|| "claude".to_string()),
        }
    }

    /// Check if the CLI command is available in the system PATH.
    async fn check_available(&self) -> bool {
        #[cfg(unix)]
        let check_cmd = "which";
        #[cfg(windows)]
        let check_cmd = "where";

        Command::new(check_cmd)
            .arg(&self.cli_command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run one CLI invocation and shape its output into a response.
    async fn run_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> LLMResult<ModelResponse> {
        let prompt = serde_json::to_string(messages).map_err(|e| {
            LLMError::new(format!(
                "Error executing Claude CLI: failed to encode messages: {}",
                e
            ))
        })?;

        let mut cmd = Command::new(&self.cli_command);
        cmd.arg(format!("--model={}", model))
            .arg("-p")
            .arg(prompt)
            .arg("--output-format=json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("spawning {} for model {}", self.cli_command, model);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LLMError::new(format!(
                    "Claude CLI not found. Please ensure '{}' command is available in PATH",
                    self.cli_command
                ))
            } else {
                LLMError::new(format!("Error executing Claude CLI: {}", e))
            }
        })?;

        // On expiry the wait_with_output future is dropped without
        // kill_on_drop, so a timed-out CLI keeps running unreaped.
        let output = timeout(options.timeout, child.wait_with_output())
            .await
            .map_err(|_| LLMError::new("Claude CLI command timed out"))?
            .map_err(|e| LLMError::new(format!("Error executing Claude CLI: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LLMError::new(format!("Claude CLI failed: {}", stderr)));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| LLMError::new(format!("Error executing Claude CLI: {}", e)))?;
        let payload = CliPayload::parse(stdout.trim());

        Ok(build_response(model, payload))
    }
}

/// Shape a parsed CLI payload into the standard response form.
fn build_response(model: &str, payload: CliPayload) -> ModelResponse {
    let suffix = Uuid::new_v4().simple().to_string();

    ModelResponse {
        id: format!("{}_{}", PROVIDER_NAME, &suffix[..8]),
        model: model.to_string(),
        created: Utc::now().timestamp(),
        choices: vec![Choice {
            index: 0,
            message: ChoiceMessage {
                role: Role::Assistant,
                content: payload.result,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: payload.usage.into(),
        cost_usd: payload.total_cost_usd,
        origin: ResponseOrigin::CliProvider,
    }
}

#[async_trait]
impl CustomProvider for ClaudeCodeAdapter {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn is_available(&self) -> bool {
        self.check_available().await
    }

    async fn completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> LLMResult<ModelResponse> {
        self.run_completion(model, messages, options).await
    }
}
