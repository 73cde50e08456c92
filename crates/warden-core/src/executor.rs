//! The plan executor: runs what the validator let through, one step at a time.
//!
//! The executor never decides anything on its own. It takes a `PlanVerdict`,
//! asks it for the executable subset, and drives a `ToolRunner` over those
//! steps in order. A failing step is recorded and execution moves on to the
//! next one; steps are independent tool calls, not a transaction.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use warden_contracts::{
    execution::{ExecutionReport, StepOutcome, StepReport},
    verdict::PlanVerdict,
};

use crate::traits::ToolRunner;

/// Drives a `ToolRunner` over the executable steps of a plan verdict.
pub struct PlanExecutor {
    runner: Box<dyn ToolRunner>,
}

impl PlanExecutor {
    pub fn new(runner: Box<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// Execute the steps `verdict` allows and report on each one.
    ///
    /// Step indices in the report are the positions in the plan originally
    /// proposed, so they line up with `verdict.blocked_steps`. Returns an
    /// empty report when the verdict has nothing executable.
    pub fn execute(&self, verdict: &PlanVerdict) -> ExecutionReport {
        let Some(plan) = verdict.executable_plan() else {
            info!(outcome = ?verdict.outcome(), "nothing executable in plan verdict");
            return ExecutionReport::default();
        };

        // The corrected plan is the original minus the blocked positions, so
        // walking the original numbering and skipping those recovers indices.
        let blocked: HashSet<usize> = verdict.blocked_steps.iter().map(|b| b.step_index).collect();
        let original_indices = (1..).filter(|i| !blocked.contains(i));

        let mut report = ExecutionReport::default();

        for (step_index, action) in original_indices.zip(plan.steps.iter()) {
            debug!(step = step_index, action = %action.name, "running step");

            let outcome = match self.runner.run(action) {
                Ok(output) => StepOutcome::Succeeded { output },
                Err(e) => {
                    warn!(step = step_index, action = %action.name, error = %e, "step failed");
                    StepOutcome::Failed { error: e.to_string() }
                }
            };

            report.steps.push(StepReport {
                step_index,
                action_name: action.name.clone(),
                outcome,
                finished_at: Utc::now(),
            });
        }

        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "plan execution finished"
        );
        report
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
