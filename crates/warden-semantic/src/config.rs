//! Semantic checker settings.

use serde::{Deserialize, Serialize};

use warden_contracts::error::{WardenError, WardenResult};

/// Settings for the semantic checker and its HTTP completion backend.
///
/// Every field is defaulted, so an empty `[semantic]` table is valid. The
/// checker is off unless `enabled` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible completion server.
    pub endpoint: String,
    /// Model name sent with each request; servers hosting one model ignore it.
    pub model: Option<String>,
    /// Upper bound on one semantic call, including the HTTP round trip.
    pub timeout_ms: u64,
    pub action_max_tokens: u32,
    pub plan_max_tokens: u32,
    pub temperature: f32,
    pub stop: Vec<String>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://127.0.0.1:8080".to_string(),
            model: None,
            timeout_ms: 3000,
            action_max_tokens: 100,
            plan_max_tokens: 150,
            temperature: 0.1,
            stop: vec!["\n\n".to_string(), "User:".to_string(), "<think>".to_string()],
        }
    }
}

impl SemanticConfig {
    /// Parse `s` as a TOML `SemanticConfig` document.
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        toml::from_str(s).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to parse semantic TOML: {}", e),
        })
    }
}
