//! Custom provider adapters for local AI CLIs.
//!
//! Adapters shell out to a locally installed CLI rather than making direct
//! API calls, leveraging the user's existing CLI authentication.
//!
//! # Available Adapters
//!
//! - [`ClaudeCodeAdapter`] - Adapter for the Claude Code CLI (`claude`)
//!
//! Each adapter implements the
//! [`CustomProvider`](crate::provider::CustomProvider) trait and handles
//! its own CLI argument conventions and output decoding.

pub mod claude;

// Re-export adapters for convenience
pub use claude::ClaudeCodeAdapter;
