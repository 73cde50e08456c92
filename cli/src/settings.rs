//! The composite configuration file.
//!
//! ```toml
//! [rules]
//! protected_paths = ["C:\\Windows", "/etc"]
//!
//! [risk]
//! escalated_actions = ["modify_file", "git_push"]
//!
//! [semantic]
//! enabled = true
//! endpoint = "http://127.0.0.1:8080"
//! ```
//!
//! Every section, and every key inside it, falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use warden_contracts::{
    error::{WardenError, WardenResult},
    risk::RiskProfile,
};
use warden_core::Validator;
use warden_rules::{RuleConfig, StaticRuleEngine};
use warden_semantic::{CompletionChecker, SemanticConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: RuleConfig,
    pub risk: RiskProfile,
    pub semantic: SemanticConfig,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        toml::from_str(s).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> WardenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> WardenResult<Self> {
        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Wire a validator from these settings. The semantic checker is only
    /// attached when enabled; its backend connects on first use.
    pub fn build_validator(&self) -> Validator {
        let engine = StaticRuleEngine::with_os_probe(self.rules.clone());
        let validator = Validator::new(Box::new(engine), self.risk.clone());
        if self.semantic.enabled {
            validator.with_semantic(Box::new(CompletionChecker::http(self.semantic.clone())))
        } else {
            validator
        }
    }

    /// The effective settings rendered as TOML.
    pub fn to_toml(&self) -> WardenResult<String> {
        toml::to_string_pretty(self).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to render configuration TOML: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn sections_override_independently() {
        let settings = Settings::from_toml_str(
            r#"
            [rules]
            primary_branches = ["trunk"]

            [risk]
            escalated_actions = []

            [semantic]
            timeout_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(settings.rules.primary_branches, vec!["trunk".to_string()]);
        assert_eq!(settings.rules.default_branch, "main");
        assert!(settings.risk.escalated_actions.is_empty());
        assert!(settings.risk.is_high_risk("git_push"));
        assert_eq!(settings.semantic.timeout_ms, 500);
        assert!(!settings.semantic.enabled);
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = Settings::from_file(Path::new("/nonexistent/warden.toml")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("failed to read configuration file"), "{message}");
        assert!(message.contains("/nonexistent/warden.toml"), "{message}");
    }

    #[test]
    fn rendered_toml_parses_back() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        assert_eq!(Settings::from_toml_str(&rendered).unwrap(), settings);
    }
}
