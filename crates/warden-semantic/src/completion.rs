//! The text-completion seam the semantic checker is built on.

use warden_contracts::error::WardenResult;

/// One completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Generation stops at the first of these sequences.
    pub stop: Vec<String>,
}

/// A blocking text-completion backend.
///
/// Implementations must be shareable across threads: every call runs on a
/// short-lived worker thread so it can be abandoned on timeout.
pub trait TextCompletion: Send + Sync {
    /// Complete `request.prompt` and return the generated text only.
    fn complete(&self, request: &CompletionRequest) -> WardenResult<String>;
}
