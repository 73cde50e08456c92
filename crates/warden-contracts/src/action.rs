//! Action and plan types.
//!
//! These types carry what the planner model proposed into the validator.
//! They are intentionally minimal: WARDEN does not know what a tool does,
//! only its name and the arguments it will receive.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single proposed side-effecting operation.
///
/// The wire form matches what the planner model emits inside a plan:
/// `{"action": "delete_path", "args": {"path": "..."}}`. Arguments are an
/// untyped JSON object; the validator only checks for presence and inspects
/// string values of well-known keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Tool name (e.g. "write_file", "git_push").
    #[serde(rename = "action")]
    pub name: String,
    /// Arguments keyed by name. Missing `args` deserializes as empty.
    #[serde(rename = "args", default)]
    pub arguments: Map<String, Value>,
}

impl Action {
    /// Build an action from a name and a JSON object of arguments.
    ///
    /// Non-object `arguments` values are treated as "no arguments".
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { name: name.into(), arguments }
    }

    /// Return the argument `key` if it is present and a JSON string.
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }

    /// Return true if `key` is present and truthy.
    ///
    /// Null, `false`, zero, the empty string, and empty arrays/objects are
    /// all treated as missing.
    pub fn has_arg(&self, key: &str) -> bool {
        self.arguments.get(key).is_some_and(is_truthy)
    }
}

/// Truthiness of an untyped argument value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// An ordered batch of actions proposed for one user turn.
///
/// A plan with no steps is structurally invalid; the plan validator rejects
/// it without looking at anything else.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Steps in execution order. Absent in the wire form means empty.
    #[serde(default)]
    pub steps: Vec<Action>,
    /// Human-readable description of what the plan does.
    #[serde(default)]
    pub summary: String,
}

impl Plan {
    /// Construct a plan from steps and a summary.
    pub fn new(steps: Vec<Action>, summary: impl Into<String>) -> Self {
        Self { steps, summary: summary.into() }
    }

    /// True if the plan has at least one step.
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }
}
