//! The WARDEN validator: rule engine first, semantic review second.
//!
//! Per plan the validator walks a fixed sequence:
//!
//!   RECEIVED → PER-STEP CHECKED → (HIGH-RISK? → SEMANTIC CHECKED) → VERDICT
//!
//! There is no re-entry and no retry. The rule engine's rejections are
//! final; the semantic checker is only consulted about input the rule
//! engine already accepted, and its failures never reject on their own.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use warden_contracts::{
    action::{Action, Plan},
    risk::RiskProfile,
    semantic::SemanticVerdict,
    verdict::{BlockedStep, PlanVerdict, ValidationVerdict},
};

use crate::traits::{RuleEngine, SemanticChecker};

/// Feedback for a plan that has no steps to check.
pub const STRUCTURAL_FAILURE_FEEDBACK: &str =
    "Invalid plan: it must contain at least one step in 'steps'.";

/// Summary given to a corrected plan whose original had none.
const DEFAULT_CORRECTED_SUMMARY: &str = "Corrected plan";

/// Validates single actions and whole plans.
///
/// Owns the rule engine, the risk tables, and (optionally) a semantic
/// checker handle. Holds no per-call state, so one validator serves every
/// turn of a conversation.
pub struct Validator {
    rules: Box<dyn RuleEngine>,
    semantic: Option<Box<dyn SemanticChecker>>,
    risk: RiskProfile,
}

impl Validator {
    /// Create a rules-only validator.
    pub fn new(rules: Box<dyn RuleEngine>, risk: RiskProfile) -> Self {
        Self { rules, semantic: None, risk }
    }

    /// Attach a semantic checker for escalated and high-risk actions.
    pub fn with_semantic(mut self, checker: Box<dyn SemanticChecker>) -> Self {
        self.semantic = Some(checker);
        self
    }

    pub fn risk(&self) -> &RiskProfile {
        &self.risk
    }

    /// The semantic checker, if one is attached and able to answer.
    fn available_checker(&self) -> Option<&dyn SemanticChecker> {
        self.semantic.as_deref().filter(|checker| checker.is_available())
    }

    /// Validate one tool call given as name + argument map.
    pub fn validate(
        &self,
        action_name: &str,
        arguments: &Map<String, Value>,
        user_request: &str,
    ) -> ValidationVerdict {
        let action = Action {
            name: action_name.to_string(),
            arguments: arguments.clone(),
        };
        self.validate_action(&action, user_request)
    }

    /// Validate one tool call.
    ///
    /// 1. Rule engine; a rejection is returned unchanged.
    /// 2. For escalated actions with an available checker, semantic review:
    ///    `Rejected` rejects, `Warning`/`Suggest` add warnings, errors add a
    ///    warning and nothing else.
    pub fn validate_action(&self, action: &Action, user_request: &str) -> ValidationVerdict {
        let verdict = self.rules.check(action);
        if !verdict.approved {
            warn!(
                action = %action.name,
                reason = %verdict.reason_str(),
                "rule engine rejected action"
            );
            return verdict;
        }

        let mut warnings = verdict.warnings;

        if self.risk.is_escalated(&action.name) {
            if let Some(checker) = self.available_checker() {
                debug!(action = %action.name, "escalating action to semantic review");
                match checker.review_action(action, user_request) {
                    Ok(SemanticVerdict::Approved) => {}
                    Ok(SemanticVerdict::Rejected { reason }) => {
                        warn!(action = %action.name, reason = %reason, "semantic review rejected action");
                        return ValidationVerdict::reject(format!(
                            "'{}' rejected by semantic review: {}",
                            action.name, reason
                        ));
                    }
                    Ok(SemanticVerdict::Warning { message }) => warnings.push(message),
                    Ok(SemanticVerdict::Suggest { suggestion }) => {
                        warnings.push(format!("suggestion: {suggestion}"))
                    }
                    Err(e) => {
                        warn!(action = %action.name, error = %e, "semantic review failed; continuing on rules");
                        warnings.push(format!("semantic review failed: {e}"));
                    }
                }
            }
        }

        ValidationVerdict::approve(warnings)
    }

    /// Validate a whole plan before any of it runs.
    ///
    /// Blocked steps keep their 1-based position in `plan`; accepted steps
    /// form the corrected plan whenever at least one survives, even if the
    /// plan as a whole is not approved. The semantic checker is consulted
    /// only when every step passed and at least one is high-risk.
    pub fn validate_plan(&self, plan: &Plan, user_request: &str) -> PlanVerdict {
        if !plan.has_steps() {
            warn!("plan has no steps; rejecting structurally");
            return PlanVerdict::structural_rejection(STRUCTURAL_FAILURE_FEEDBACK);
        }

        let mut approved = true;
        let mut accepted: Vec<Action> = Vec::new();
        let mut blocked_steps: Vec<BlockedStep> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        // ── Per-step rule checks ─────────────────────────────────────────────
        for (position, step) in plan.steps.iter().enumerate() {
            let step_index = position + 1;
            let verdict = self.rules.check(step);

            if verdict.approved {
                debug!(step = step_index, action = %step.name, "step accepted");
                warnings.extend(verdict.warnings);
                accepted.push(step.clone());
            } else {
                let reason = verdict.reason.unwrap_or_default();
                warn!(step = step_index, action = %step.name, reason = %reason, "step blocked");
                blocked_steps.push(BlockedStep {
                    step_index,
                    action_name: step.name.clone(),
                    reason,
                });
                approved = false;
            }
        }

        // ── Semantic review of rule-clean, high-risk plans ───────────────────
        let mut semantic_rejection: Option<String> = None;
        let mut suggestion: Option<String> = None;

        let has_high_risk = plan.steps.iter().any(|s| self.risk.is_high_risk(&s.name));
        if approved && has_high_risk {
            if let Some(checker) = self.available_checker() {
                debug!(steps = plan.steps.len(), "escalating plan to semantic review");
                match checker.review_plan(plan, user_request) {
                    Ok(SemanticVerdict::Approved) => {}
                    Ok(SemanticVerdict::Rejected { reason }) => {
                        warn!(reason = %reason, "semantic review rejected plan");
                        approved = false;
                        semantic_rejection = Some(reason);
                    }
                    Ok(SemanticVerdict::Warning { message }) => warnings.push(message),
                    Ok(SemanticVerdict::Suggest { suggestion: s }) => suggestion = Some(s),
                    Err(e) => {
                        warn!(error = %e, "semantic plan review failed; continuing on rules");
                        warnings.push(format!("semantic plan review failed: {e}"));
                    }
                }
            }
        }

        // ── Corrected plan and feedback ──────────────────────────────────────
        let kept = accepted.len();
        let corrected_plan = (!accepted.is_empty()).then(|| {
            let summary = if plan.summary.is_empty() {
                DEFAULT_CORRECTED_SUMMARY.to_string()
            } else {
                plan.summary.clone()
            };
            Plan::new(accepted, summary)
        });

        let feedback = compose_feedback(
            &blocked_steps,
            kept,
            semantic_rejection.as_deref(),
            &warnings,
            suggestion.as_deref(),
        );

        info!(
            approved,
            blocked = blocked_steps.len(),
            kept,
            warnings = warnings.len(),
            "plan validated"
        );

        PlanVerdict {
            approved,
            corrected_plan,
            blocked_steps,
            warnings,
            feedback,
        }
    }
}

/// Build the human-readable summary returned with every plan verdict.
fn compose_feedback(
    blocked_steps: &[BlockedStep],
    kept: usize,
    semantic_rejection: Option<&str>,
    warnings: &[String],
    suggestion: Option<&str>,
) -> String {
    let mut feedback = if !blocked_steps.is_empty() {
        let lines = blocked_steps
            .iter()
            .map(|b| format!("  step {} ({}): {}", b.step_index, b.action_name, b.reason))
            .collect::<Vec<_>>()
            .join("\n");
        let remainder = if kept == 0 {
            "No valid steps remain; the plan was rejected.".to_string()
        } else {
            format!("Corrected plan available with {kept} valid step(s).")
        };
        format!("Plan partially rejected:\n{lines}\n\n{remainder}")
    } else if let Some(reason) = semantic_rejection {
        format!("Plan rejected by semantic review: {reason}")
    } else if !warnings.is_empty() {
        let lines = warnings
            .iter()
            .map(|w| format!("  - {w}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Plan approved with warnings:\n{lines}")
    } else {
        "Plan approved, ready for execution.".to_string()
    };

    if let Some(s) = suggestion {
        feedback.push_str(&format!("\nSuggestion: {s}"));
    }
    feedback
}

// ── Tests ────────────────────────────────────────────────────────────────────
