//! Static risk classification of action names.
//!
//! Every action is rule-checked. On top of that an action may be
//! *escalated* (a single call is also reviewed by the semantic checker) or
//! *high-risk* (its presence in a plan triggers a semantic review of the
//! whole plan). The tables are configuration data, never runtime state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Risk class of one action name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskClass {
    /// Rule-checked only.
    Unclassified,
    /// Rule-checked, then semantic-checked when a checker is available.
    Escalated,
    /// Not escalated on its own, but triggers semantic review of a plan.
    HighRisk,
}

/// The classification tables consulted by the validator.
///
/// Deserializable from the `[risk]` section of the configuration file.
/// Missing keys fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskProfile {
    /// Actions reviewed by the semantic checker even as single calls.
    pub escalated_actions: BTreeSet<String>,
    /// Actions whose presence makes a plan eligible for semantic review.
    pub high_risk_actions: BTreeSet<String>,
}

impl Default for RiskProfile {
    fn default() -> Self {
        let set = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            // delete_path is fully handled by the rule engine.
            escalated_actions: set(&["modify_file", "git_push"]),
            high_risk_actions: set(&["delete_path", "modify_file", "git_push", "git_workflow"]),
        }
    }
}

impl RiskProfile {
    /// Classify `action_name`. Escalation wins over high-risk membership.
    pub fn classify(&self, action_name: &str) -> RiskClass {
        if self.escalated_actions.contains(action_name) {
            RiskClass::Escalated
        } else if self.high_risk_actions.contains(action_name) {
            RiskClass::HighRisk
        } else {
            RiskClass::Unclassified
        }
    }

    pub fn is_escalated(&self, action_name: &str) -> bool {
        self.escalated_actions.contains(action_name)
    }

    pub fn is_high_risk(&self, action_name: &str) -> bool {
        self.high_risk_actions.contains(action_name)
    }
}
