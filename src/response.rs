//! CLI payload decoding and the normalized completion response.
//!
//! The external CLI prints one JSON object on stdout. Decoding it is
//! deliberately best-effort: any field may be absent and malformed output
//! degrades to defaults instead of failing (see [`CliPayload::parse`]).
//! Process-level failures stay strict; only payload decoding is lenient.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::Role;

/// Token counters reported by one CLI invocation.
///
/// Built from a loosely-typed JSON mapping: the first two counters accept
/// either the Anthropic-style (`input_tokens`/`output_tokens`) or the
/// OpenAI-style (`prompt_tokens`/`completion_tokens`) key spelling.
/// Missing, null, or non-numeric values coerce to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub cache_read_input_tokens: u64,
}

impl CliUsage {
    /// Coerce a JSON value (expected to be an object) into usage counters.
    pub fn from_value(value: &Value) -> Self {
        Self {
            input_tokens: count_field(value, &["input_tokens", "prompt_tokens"]),
            output_tokens: count_field(value, &["output_tokens", "completion_tokens"]),
            cache_creation_input_tokens: count_field(value, &["cache_creation_input_tokens"]),
            cache_read_input_tokens: count_field(value, &["cache_read_input_tokens"]),
        }
    }
}

/// Look up the first present key and coerce it to a non-negative count.
///
/// A key that is present but null wins over a later alternate spelling.
fn count_field(map: &Value, keys: &[&str]) -> u64 {
    for key in keys {
        if let Some(value) = map.get(*key) {
            return coerce_count(value);
        }
    }
    0
}

fn coerce_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 }))
        .unwrap_or(0)
}

/// The parsed output of one CLI invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliPayload {
    /// The generated text. Empty when the CLI reported none.
    pub result: String,
    /// Token counters, zeroed when absent.
    pub usage: CliUsage,
    /// Cost in USD as computed by the CLI itself.
    pub total_cost_usd: f64,
    /// Optional result subtype tag (e.g. "success").
    pub subtype: Option<String>,
}

impl CliPayload {
    /// Best-effort decode of raw CLI stdout.
    ///
    /// Malformed JSON, non-JSON input, and the empty string all degrade to
    /// an empty mapping, so every field falls back to its default. This
    /// never fails; it can mask malformed-output bugs in the CLI, which is
    /// why the fallback is logged.
    pub fn parse(raw: &str) -> Self {
        let data: Value = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::warn!("discarding malformed CLI output: {}", e);
                Value::Null
            })
        };

        let result = match data.get("result") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        Self {
            result,
            usage: CliUsage::from_value(data.get("usage").unwrap_or(&Value::Null)),
            total_cost_usd: data
                .get("total_cost_usd")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            subtype: data
                .get("subtype")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Where a response came from. Decides how its cost is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseOrigin {
    /// Produced by a local CLI adapter; carries its own precomputed cost.
    CliProvider,
    /// Produced by a standard hosted provider; priced from token counts
    /// and published pricing tables.
    #[default]
    Standard,
}

/// Aggregated usage block on a completion response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
}

impl From<CliUsage> for ResponseUsage {
    fn from(usage: CliUsage) -> Self {
        Self {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage.input_tokens + usage.output_tokens,
            cache_creation_input_tokens: usage.cache_creation_input_tokens,
            cache_read_input_tokens: usage.cache_read_input_tokens,
        }
    }
}

/// The message inside a completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub role: Role,
    pub content: String,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChoiceMessage,
    pub finish_reason: String,
}

/// A completion response in the standard multi-provider shape.
///
/// `cost_usd` is a non-standard extension: for CLI-originated responses it
/// carries the cost the external tool computed, and [`ResponseOrigin`] tags
/// which cost path applies (see `LlmClient::cost`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Generated identifier: provider-name prefix plus a random hex suffix.
    pub id: String,
    /// The model the caller requested.
    pub model: String,
    /// Unix timestamp of response creation.
    pub created: i64,
    pub choices: Vec<Choice>,
    pub usage: ResponseUsage,
    /// Monetary cost in USD.
    #[serde(default)]
    pub cost_usd: f64,
    #[serde(skip)]
    pub origin: ResponseOrigin,
}

impl ModelResponse {
    /// Content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
