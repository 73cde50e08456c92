//! Plan documents read from disk.
//!
//! A plan file is the JSON the planner model emits:
//!
//! ```json
//! { "summary": "...", "steps": [ { "action": "read_file", "args": { "filename": "a.txt" } } ] }
//! ```
//!
//! The document's shape is checked against a JSON Schema before it is
//! deserialized. `steps` is deliberately optional here: a plan without steps
//! is well-formed JSON that the validator rejects with its own feedback.

use std::path::Path;

use serde_json::{json, Value};
use tracing::warn;

use warden_contracts::{
    action::Plan,
    error::{WardenError, WardenResult},
};

fn plan_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["action"],
                    "properties": {
                        "action": { "type": "string", "minLength": 1 },
                        "args": { "type": "object" }
                    }
                }
            }
        }
    })
}

/// Check `document` against the plan schema and deserialize it.
pub fn parse_plan(document: &Value) -> WardenResult<Plan> {
    let malformed = |reason: String| WardenError::MalformedPlan { reason };

    let validator = jsonschema::validator_for(&plan_schema())
        .map_err(|e| malformed(format!("invalid plan schema: {}", e)))?;

    let violations: Vec<String> = validator
        .iter_errors(document)
        .map(|error| {
            let message = format!("at '{}': {}", error.instance_path, error);
            warn!(%message, "plan document violates schema");
            message
        })
        .collect();
    if !violations.is_empty() {
        return Err(malformed(violations.join("; ")));
    }

    serde_json::from_value(document.clone()).map_err(|e| malformed(e.to_string()))
}

/// Read and parse the plan file at `path`.
pub fn load_plan(path: &Path) -> WardenResult<Plan> {
    let contents = std::fs::read_to_string(path).map_err(|e| WardenError::MalformedPlan {
        reason: format!("failed to read plan file '{}': {}", path.display(), e),
    })?;
    let document: Value = serde_json::from_str(&contents).map_err(|e| WardenError::MalformedPlan {
        reason: format!("plan file '{}' is not valid JSON: {}", path.display(), e),
    })?;
    parse_plan(&document)
}
