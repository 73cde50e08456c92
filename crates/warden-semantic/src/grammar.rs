//! Prompts and the closed answer grammar.
//!
//! The checker must answer with one line:
//!
//! ```text
//! APPROVED
//! REJECTED: <reason>
//! WARNING: <message>      (single actions)
//! SUGGEST: <improvement>  (plans)
//! ```
//!
//! Reasoning models may prefix their answer with a `<think>` block; it is
//! removed before parsing. Any other shape is an error, never an approval.

use serde_json::Value;

use warden_contracts::{
    action::{Action, Plan},
    error::{WardenError, WardenResult},
    semantic::SemanticVerdict,
};

/// Longest argument rendering shown per plan step.
const STEP_ARGS_PREVIEW_CHARS: usize = 100;

pub fn action_prompt(action: &Action, user_request: &str) -> String {
    let arguments = Value::Object(action.arguments.clone());
    format!(
        "Validate this action:\n\
         User request: \"{user_request}\"\n\
         Tool: {}\n\
         Arguments: {arguments}\n\
         \n\
         Is this action safe and does it match the user request? Answer ONLY with:\n\
         APPROVED - if action is safe and correct\n\
         REJECTED: <reason> - if action should be blocked\n\
         WARNING: <message> - if action needs attention but can proceed\n\
         \n\
         Answer:",
        action.name
    )
}

pub fn plan_prompt(plan: &Plan, user_request: &str) -> String {
    let steps = plan
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}({})", i + 1, step.name, step_args_preview(step)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this execution plan:\n\
         User request: \"{user_request}\"\n\
         \n\
         Plan steps:\n\
         {steps}\n\
         \n\
         Validate:\n\
         1. Does the plan match the user's intent?\n\
         2. Is the order of steps correct?\n\
         3. Are there any security risks?\n\
         \n\
         Answer with ONE line:\n\
         APPROVED - if plan is correct\n\
         REJECTED: <reason> - if plan should be blocked\n\
         SUGGEST: <improvement> - if plan can be improved\n\
         \n\
         Answer:"
    )
}

/// Compact JSON of a step's arguments, cut to a fixed number of characters.
fn step_args_preview(step: &Action) -> String {
    Value::Object(step.arguments.clone())
        .to_string()
        .chars()
        .take(STEP_ARGS_PREVIEW_CHARS)
        .collect()
}

/// Parse raw checker output into a `SemanticVerdict`.
pub fn parse_answer(output: &str) -> WardenResult<SemanticVerdict> {
    let unparseable = || WardenError::SemanticUnparseable {
        output: output.to_string(),
    };

    let cleaned = strip_think_blocks(output);
    let line = cleaned
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(unparseable)?;

    if keyword_rest(line, "APPROVED").is_some() {
        return Ok(SemanticVerdict::Approved);
    }

    let detailed: [(&str, fn(String) -> SemanticVerdict); 3] = [
        ("REJECTED", |reason| SemanticVerdict::Rejected { reason }),
        ("WARNING", |message| SemanticVerdict::Warning { message }),
        ("SUGGEST", |suggestion| SemanticVerdict::Suggest { suggestion }),
    ];
    for (keyword, build) in detailed {
        if let Some(rest) = keyword_rest(line, keyword) {
            return if rest.is_empty() {
                Err(unparseable())
            } else {
                Ok(build(rest.to_string()))
            };
        }
    }

    Err(unparseable())
}

/// If `line` starts with `keyword` (ASCII case-insensitive) followed by a
/// word boundary, return the remainder with separators trimmed.
fn keyword_rest<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &line[keyword.len()..];
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    Some(rest.trim_start_matches([':', '-', ' ', '\t']).trim())
}

/// Remove `<think>…</think>` blocks. An unterminated block runs to the end.
fn strip_think_blocks(output: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let mut kept = String::with_capacity(output.len());
    let mut rest = output;
    loop {
        let lower = rest.to_ascii_lowercase();
        match lower.find(OPEN) {
            None => {
                // A stray closing tag means the opening one was in the prompt.
                match lower.find(CLOSE) {
                    Some(end) => kept.push_str(&rest[end + CLOSE.len()..]),
                    None => kept.push_str(rest),
                }
                return kept;
            }
            Some(start) => {
                kept.push_str(&rest[..start]);
                match lower[start..].find(CLOSE) {
                    Some(end) => rest = &rest[start + end + CLOSE.len()..],
                    None => return kept,
                }
            }
        }
    }
}
