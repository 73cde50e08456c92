//! Per-step execution reports.
//!
//! `StepReport` is what the plan executor records for each step it runs.
//! `ExecutionReport` is the ordered collection returned to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How one executed step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum StepOutcome {
    /// The tool ran and returned `output`.
    Succeeded { output: String },
    /// The tool ran and failed with `error`.
    Failed { error: String },
}

/// An immutable record of one executed plan step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based index of the step in the plan originally proposed.
    pub step_index: usize,
    pub action_name: String,
    pub outcome: StepOutcome,
    /// Wall-clock time the step finished (UTC).
    pub finished_at: DateTime<Utc>,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, StepOutcome::Succeeded { .. })
    }
}

/// The result of running the executable part of a plan verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Reports in execution order. Empty when nothing was executable.
    pub steps: Vec<StepReport>,
}

impl ExecutionReport {
    pub fn succeeded_count(&self) -> usize {
        self.steps.iter().filter(|s| s.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.steps.len() - self.succeeded_count()
    }

    /// True if at least one step ran and none failed.
    pub fn all_succeeded(&self) -> bool {
        !self.steps.is_empty() && self.failed_count() == 0
    }
}
