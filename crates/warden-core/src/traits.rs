//! Core trait definitions for the WARDEN validation layer.
//!
//! These traits define the seams between the validator and everything it
//! does not own:
//!
//! - `RuleEngine`     : trusted, deterministic static checks on one action
//! - `SemanticChecker`: optional advisory reviewer (may be model-backed)
//! - `FileProbe`      : read-only filesystem queries used by rule checks
//! - `ToolRunner`     : the side-effecting tools a validated plan drives
//!
//! The validator never calls a `ToolRunner`; only the plan executor does,
//! and only with steps the validator let through.

use std::io;
use std::path::{Path, PathBuf};

use warden_contracts::{
    action::{Action, Plan},
    error::WardenResult,
    semantic::SemanticVerdict,
    verdict::ValidationVerdict,
};

/// The static rule engine: the first and authoritative gate.
///
/// Implementations must be deterministic for a fixed filesystem state and
/// must never mutate anything. Internal faults (a probe that cannot read a
/// directory, say) are reported as verdict warnings, which is why `check`
/// is infallible.
pub trait RuleEngine: Send + Sync {
    /// Decide whether `action` may run.
    fn check(&self, action: &Action) -> ValidationVerdict;
}

/// An optional secondary reviewer consulted for high-risk actions.
///
/// A checker can add warnings or reject, but never approve something the
/// rule engine rejected: the validator only asks it about rule-clean input.
/// Every `Err` is treated as a degraded capability and becomes a warning.
pub trait SemanticChecker: Send + Sync {
    /// True if the checker can answer queries.
    ///
    /// Lazily loading implementations perform their one-time initialization
    /// here. An unavailable checker is skipped silently.
    fn is_available(&self) -> bool;

    /// Review a single rule-clean action against the user's request.
    fn review_action(&self, action: &Action, user_request: &str) -> WardenResult<SemanticVerdict>;

    /// Review a whole rule-clean plan against the user's request.
    fn review_plan(&self, plan: &Plan, user_request: &str) -> WardenResult<SemanticVerdict>;
}

/// Read-only filesystem queries.
///
/// Split out so rule checks can run against an in-memory filesystem in
/// tests. Implementations must not create, modify, or delete anything.
pub trait FileProbe: Send + Sync {
    /// True if something exists at `path`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// True if `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Resolve `path` to its absolute, symlink-free form.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Runs one validated tool call.
///
/// Implemented by the hosting assistant on top of its file, git, and
/// network primitives.
pub trait ToolRunner {
    /// Run `action` and return its textual result.
    fn run(&self, action: &Action) -> WardenResult<String>;
}
