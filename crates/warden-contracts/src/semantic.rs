//! Semantic checker result grammar.
//!
//! The checker is asked to answer with exactly one line from a closed set.
//! Anything outside that set is a failed call, not an approval.

use serde::{Deserialize, Serialize};

/// The parsed answer of the semantic checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SemanticVerdict {
    /// `APPROVED`
    Approved,
    /// `REJECTED: <reason>`
    Rejected { reason: String },
    /// `WARNING: <message>`; the action may proceed.
    Warning { message: String },
    /// `SUGGEST: <improvement>`; plan-level only, the plan may proceed.
    Suggest { suggestion: String },
}

impl SemanticVerdict {
    /// The keyword each variant is written with in checker output.
    pub fn keyword(&self) -> &'static str {
        match self {
            SemanticVerdict::Approved => "APPROVED",
            SemanticVerdict::Rejected { .. } => "REJECTED",
            SemanticVerdict::Warning { .. } => "WARNING",
            SemanticVerdict::Suggest { .. } => "SUGGEST",
        }
    }
}
