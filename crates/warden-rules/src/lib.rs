//! # warden-rules
//!
//! The deterministic half of WARDEN: a static rule engine that checks each
//! proposed action against configurable tables before anything executes.
//!
//! ## Overview
//!
//! [`StaticRuleEngine`] implements the
//! [`RuleEngine`](warden_core::traits::RuleEngine) trait. Its tables live in
//! a [`RuleConfig`], which has sensible built-in defaults and can be
//! overridden from TOML. Filesystem queries go through a
//! [`FileProbe`](warden_core::traits::FileProbe); [`OsProbe`] is the real one.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use warden_rules::StaticRuleEngine;
//!
//! let engine = StaticRuleEngine::from_file(Path::new("warden-rules.toml"))?;
//! // Pass `engine` to `warden_core::Validator::new(...)`.
//! ```
//!
//! ## Path matching
//!
//! Path arguments are normalized lexically ([`NormalizedPath`]) and compared
//! component-wise against the deny list. Relative paths are also resolved
//! against the working directory, and paths that exist are compared in their
//! canonical form so a symlink cannot smuggle a protected target past the
//! check.

pub mod config;
pub mod engine;
pub mod path;
pub mod probe;

pub use config::RuleConfig;
pub use engine::StaticRuleEngine;
pub use path::NormalizedPath;
pub use probe::OsProbe;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use warden_contracts::action::Action;
    use warden_core::traits::RuleEngine;

    use crate::{RuleConfig, StaticRuleEngine};

    fn engine_in(dir: &std::path::Path) -> StaticRuleEngine {
        StaticRuleEngine::with_os_probe(RuleConfig::default()).with_base_dir(dir)
    }

    #[test]
    fn test_real_filesystem_overwrite_check() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("agent.py"), "print('hi')\n").unwrap();
        let engine = engine_in(dir.path());

        let existing = engine.check(&Action::new(
            "write_file",
            json!({ "filename": "agent.py", "content": "print('bye')" }),
        ));
        let fresh = engine.check(&Action::new(
            "write_file",
            json!({ "filename": "helper.py", "content": "x = 1" }),
        ));

        assert!(!existing.approved);
        assert!(fresh.approved, "unexpected rejection: {:?}", fresh.reason);
    }

    #[test]
    fn test_real_directory_deletion_warns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("build")).unwrap();
        let engine = engine_in(dir.path());

        let verdict = engine.check(&Action::new("delete_path", json!({ "path": "build" })));

        assert!(verdict.approved);
        assert_eq!(verdict.warnings.len(), 1);
    }

    // On macOS /etc is itself a link to /private/etc.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_real_symlink_into_etc_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/etc", dir.path().join("config")).unwrap();
        let engine = engine_in(dir.path());

        let verdict = engine.check(&Action::new("read_file", json!({ "filename": "config" })));

        assert!(!verdict.approved);
        assert!(verdict.reason_str().contains("/etc"), "reason: {}", verdict.reason_str());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_real_new_file_under_symlinked_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/etc", dir.path().join("cfg")).unwrap();
        let engine = engine_in(dir.path());

        let write = engine.check(&Action::new(
            "write_file",
            json!({ "filename": "cfg/evil.conf", "content": "x" }),
        ));
        let create = engine.check(&Action::new("create_folder", json!({ "path": "cfg/cron.d/new" })));

        assert!(!write.approved);
        assert!(write.reason_str().contains("'/etc'"), "reason: {}", write.reason_str());
        assert!(!create.approved);
    }

    #[test]
    fn test_from_toml_str_builds_engine() {
        let engine = StaticRuleEngine::from_toml_str(r#"protected_paths = ["/opt/secret"]"#).unwrap();
        assert_eq!(engine.config().protected_paths, vec!["/opt/secret".to_string()]);
        assert_eq!(engine.config().default_branch, "main");
    }
}
