//! Verdict types produced by the rule engine and the plan validator.
//!
//! A rejection is never an error: it is a verdict value with a reason the
//! caller can show to the end user as-is.

use serde::{Deserialize, Serialize};

use crate::action::Plan;

/// The decision for a single action.
///
/// Invariant: `approved == false` iff `reason` is `Some` and non-empty.
/// Warnings never block execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub approved: bool,
    /// Why the action was rejected. `None` on approval.
    pub reason: Option<String>,
    /// Non-blocking notices, in the order they were raised.
    pub warnings: Vec<String>,
}

impl ValidationVerdict {
    /// An approval carrying `warnings`.
    pub fn approve(warnings: Vec<String>) -> Self {
        Self { approved: true, reason: None, warnings }
    }

    /// A rejection. Warnings gathered before the rejecting check are dropped.
    pub fn reject(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug_assert!(!reason.is_empty(), "rejection reason must not be empty");
        Self { approved: false, reason: Some(reason), warnings: Vec::new() }
    }

    /// The rejection reason, or the empty string when approved.
    pub fn reason_str(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }
}

/// One plan step the rule engine refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedStep {
    /// 1-based position of the step in the original plan.
    pub step_index: usize,
    pub action_name: String,
    pub reason: String,
}

/// Terminal state of a plan validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanOutcome {
    /// Every step passed and no semantic rejection occurred.
    Approved,
    /// Some steps were blocked; the corrected plan holds the rest.
    PartiallyApproved,
    /// Nothing may run.
    Rejected,
}

/// The decision for a whole plan.
///
/// Invariants:
/// - `approved` iff `blocked_steps` is empty and the semantic checker did
///   not reject.
/// - `corrected_plan` holds exactly the non-blocked steps in original order.
/// - `feedback` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVerdict {
    pub approved: bool,
    pub corrected_plan: Option<Plan>,
    pub blocked_steps: Vec<BlockedStep>,
    pub warnings: Vec<String>,
    pub feedback: String,
}

impl PlanVerdict {
    /// A structural rejection: nothing was checked, nothing may run.
    pub fn structural_rejection(feedback: impl Into<String>) -> Self {
        Self {
            approved: false,
            corrected_plan: None,
            blocked_steps: Vec::new(),
            warnings: Vec::new(),
            feedback: feedback.into(),
        }
    }

    /// True when no step was blocked yet the plan is not approved, which
    /// only happens when the semantic checker rejected the plan (or the plan
    /// was structurally invalid).
    pub fn rejected_as_whole(&self) -> bool {
        !self.approved && self.blocked_steps.is_empty()
    }

    /// Derive the terminal state of this verdict.
    pub fn outcome(&self) -> PlanOutcome {
        if self.approved {
            PlanOutcome::Approved
        } else if self.executable_plan().is_some() {
            PlanOutcome::PartiallyApproved
        } else {
            PlanOutcome::Rejected
        }
    }

    /// The steps a caller is allowed to run.
    ///
    /// This is the corrected plan, except when the plan was rejected as a
    /// whole: a semantic rejection leaves the corrected plan populated for
    /// inspection, but none of it may execute.
    pub fn executable_plan(&self) -> Option<&Plan> {
        if self.rejected_as_whole() {
            return None;
        }
        self.corrected_plan.as_ref().filter(|p| p.has_steps())
    }
}
