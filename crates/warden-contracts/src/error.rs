//! Error types for the WARDEN crates.
//!
//! Policy rejections are verdicts, not errors. `WardenError` covers the
//! fallible internals: configuration loading, the semantic checker, plan
//! documents, and tool execution. None of these cross the `validate` /
//! `validate_plan` boundary.

use thiserror::Error;

/// The unified error type for the WARDEN crates.
#[derive(Debug, Error)]
pub enum WardenError {
    /// A configuration document is missing, unreadable, or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The semantic checker backend could not be loaded or is disabled.
    #[error("semantic checker unavailable: {reason}")]
    SemanticUnavailable { reason: String },

    /// The semantic checker did not answer within its time bound.
    #[error("semantic checker timed out after {timeout_ms} ms")]
    SemanticTimeout { timeout_ms: u64 },

    /// The semantic checker answered outside the closed result grammar.
    #[error("semantic checker returned unparseable output: {output:?}")]
    SemanticUnparseable { output: String },

    /// The completion backend itself failed (transport, status, payload).
    #[error("completion request failed: {reason}")]
    CompletionFailed { reason: String },

    /// A plan document does not have the expected shape.
    #[error("malformed plan: {reason}")]
    MalformedPlan { reason: String },

    /// A tool run by the plan executor reported failure.
    #[error("tool '{action}' failed: {reason}")]
    ToolFailed { action: String, reason: String },
}

/// Convenience alias used throughout the WARDEN crates.
pub type WardenResult<T> = Result<T, WardenError>;
