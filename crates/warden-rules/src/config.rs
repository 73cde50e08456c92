//! Rule tables and their TOML schema.
//!
//! Everything the static rule engine knows about specific tools lives here
//! as data: which arguments hold paths, which directories are off-limits,
//! which keys each action requires. Adding a new tool means adding rows,
//! not branches.
//!
//! Every field has a built-in default, so a TOML document only needs the
//! keys it wants to override:
//!
//! ```toml
//! protected_paths = ["C:\\Windows", "/etc"]
//! primary_branches = ["main", "trunk"]
//!
//! [required_arguments]
//! deploy_site = ["target", "commit"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use warden_contracts::error::{WardenError, WardenResult};

/// The complete rule table set consulted by `StaticRuleEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Directories that no path argument may equal or be nested under.
    pub protected_paths: Vec<String>,

    /// Substrings (case-insensitive) that make an allowed path worth a warning.
    pub sensitive_markers: Vec<String>,

    /// Argument names whose string values are treated as filesystem paths.
    pub path_arguments: Vec<String>,

    /// Exact targets the deletion action may never receive, in addition to
    /// any bare drive root (`X:`, `X:\`, `X:/`).
    pub root_aliases: Vec<String>,

    /// Extensions (without the dot, case-insensitive) treated as source code.
    pub source_extensions: Vec<String>,

    /// Required argument keys per action name. A key that is absent or
    /// falsy rejects the action.
    pub required_arguments: BTreeMap<String, Vec<String>>,

    /// The action that deletes files or directories.
    pub delete_action: String,
    /// The argument naming the deletion target.
    pub delete_target_argument: String,

    /// The action that writes a file unconditionally (overwriting it).
    pub write_action: String,
    /// The argument naming the write target.
    pub write_target_argument: String,

    /// The incremental-modify action suggested instead of an overwrite.
    pub modify_action: String,

    /// Actions that push commits to a remote branch.
    pub push_actions: Vec<String>,
    /// The argument naming the pushed branch.
    pub branch_argument: String,
    /// Branch assumed when a push action names none.
    pub default_branch: String,
    /// Branches whose push produces a warning.
    pub primary_branches: Vec<String>,

    /// Compare paths case-insensitively even when neither side carries a
    /// drive letter. Drive-letter paths are always compared case-insensitively.
    pub case_insensitive: bool,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleConfig {
    fn default() -> Self {
        let required_arguments = [
            ("write_file", &["filename", "content"][..]),
            ("read_file", &["filename"][..]),
            ("delete_path", &["path"][..]),
            ("create_folder", &["path"][..]),
            // search_text may be empty: that means "append at end".
            ("modify_file", &["filename", "replacement_text"][..]),
            ("search_files", &["query"][..]),
            // Push actions fall back to a default commit message.
            ("git_create_branch", &["branch_name"][..]),
            ("git_checkout_branch", &["branch_name"][..]),
            ("install_python_package", &["package_name"][..]),
        ]
        .into_iter()
        .map(|(action, keys)| (action.to_string(), strings(keys)))
        .collect();

        Self {
            protected_paths: strings(&[
                "C:\\Windows",
                "C:\\Program Files",
                "C:\\Program Files (x86)",
                "C:\\Users\\Default",
                "C:\\System32",
                "/bin",
                "/sbin",
                "/boot",
                "/etc",
                "/usr/bin",
                "/usr/sbin",
                "/usr/lib",
                "/System",
            ]),
            sensitive_markers: strings(&["windows", "system32"]),
            path_arguments: strings(&["path", "filename", "target_path"]),
            root_aliases: strings(&[".", "/", "\\"]),
            source_extensions: strings(&[
                "py", "js", "ts", "java", "cpp", "c", "h", "cs", "go", "rs", "rb", "php",
            ]),
            required_arguments,
            delete_action: "delete_path".to_string(),
            delete_target_argument: "path".to_string(),
            write_action: "write_file".to_string(),
            write_target_argument: "filename".to_string(),
            modify_action: "modify_file".to_string(),
            push_actions: strings(&["git_push", "git_workflow"]),
            branch_argument: "branch".to_string(),
            default_branch: "main".to_string(),
            primary_branches: strings(&["main", "master"]),
            case_insensitive: cfg!(windows),
        }
    }
}

impl RuleConfig {
    /// Parse `s` as a TOML rule table document.
    ///
    /// Returns `WardenError::ConfigError` if the TOML is malformed or a key
    /// has the wrong type.
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        toml::from_str(s).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to parse rule TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a TOML rule table document.
    pub fn from_file(path: &Path) -> WardenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to read rule file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Required argument keys for `action_name`, empty if none are declared.
    pub fn required_for(&self, action_name: &str) -> &[String] {
        self.required_arguments
            .get(action_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if `filename` ends in one of the configured source extensions.
    pub fn is_source_file(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.source_extensions
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}
