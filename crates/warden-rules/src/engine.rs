//! Static rule engine implementation.
//!
//! `StaticRuleEngine` implements the `RuleEngine` trait from warden-core
//! using the tables in a `RuleConfig`.
//!
//! Evaluation order, first rejection wins:
//!
//! 1. Path deny-list over every path-like argument (lexical, working-dir
//!    resolved, and canonical forms).
//! 2. Destructive overwrite: the write action on an existing source file.
//! 3. Root deletion: the delete action aimed at a root or `.`.
//! 4. Required arguments.
//! 5. Soft warnings: directory deletion, push to a primary branch.
//!
//! Warnings collected before a rejection are discarded with it.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use warden_contracts::{
    action::Action,
    error::WardenResult,
    verdict::ValidationVerdict,
};
use warden_core::traits::{FileProbe, RuleEngine};

use crate::config::RuleConfig;
use crate::path::{is_drive_root, NormalizedPath};
use crate::probe::OsProbe;

/// A `RuleEngine` driven entirely by `RuleConfig` data.
///
/// ```rust,ignore
/// use warden_rules::StaticRuleEngine;
///
/// let engine = StaticRuleEngine::from_file(Path::new("warden-rules.toml"))?;
/// let verdict = engine.check(&action);
/// ```
pub struct StaticRuleEngine {
    config: RuleConfig,
    probe: Box<dyn FileProbe>,
    /// Protected paths as configured, paired with their normalized form.
    protected: Vec<(String, NormalizedPath)>,
    /// Directory relative path arguments are resolved against.
    base_dir: Option<NormalizedPath>,
}

impl StaticRuleEngine {
    /// Build an engine over `config` using `probe` for filesystem queries.
    ///
    /// Relative paths are resolved against the process working directory
    /// as it is now; use `with_base_dir` to pin another one.
    pub fn new(config: RuleConfig, probe: Box<dyn FileProbe>) -> Self {
        let protected = config
            .protected_paths
            .iter()
            .map(|raw| (raw.clone(), NormalizedPath::parse(raw)))
            .collect();
        let base_dir = std::env::current_dir()
            .ok()
            .map(|dir| NormalizedPath::from_path(&dir));
        Self { config, probe, protected, base_dir }
    }

    /// Build an engine over `config` that queries the real filesystem.
    pub fn with_os_probe(config: RuleConfig) -> Self {
        Self::new(config, Box::new(OsProbe))
    }

    /// Parse `s` as a TOML rule document and build an OS-backed engine.
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        Ok(Self::with_os_probe(RuleConfig::from_toml_str(s)?))
    }

    /// Read a TOML rule document from `path` and build an OS-backed engine.
    pub fn from_file(path: &Path) -> WardenResult<Self> {
        Ok(Self::with_os_probe(RuleConfig::from_file(path)?))
    }

    /// Resolve relative path arguments against `dir` instead of the
    /// process working directory.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(NormalizedPath::from_path(dir.as_ref()));
        self
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    // ── Individual checks ─────────────────────────────────────────────────────

    /// Find the protected entry `path` falls under, if any.
    fn protected_match(&self, path: &NormalizedPath) -> Option<&str> {
        self.protected
            .iter()
            .find(|(_, protected)| path.starts_with(protected, self.config.case_insensitive))
            .map(|(raw, _)| raw.as_str())
    }

    /// Every form of `raw` that must stay clear of the deny list: the
    /// lexical form, its working-directory resolution when relative, and its
    /// physical location on disk.
    fn path_forms(&self, raw: &str, warnings: &mut Vec<String>) -> Vec<NormalizedPath> {
        let lexical = NormalizedPath::parse(raw);
        let mut forms = Vec::with_capacity(3);

        if lexical.is_relative() {
            if let Some(base) = &self.base_dir {
                forms.push(lexical.resolved_against(base));
            }
        }
        if let Some(physical) = self.physical_form(raw, warnings) {
            forms.push(physical);
        }

        forms.insert(0, lexical);
        forms
    }

    /// Where `raw` lands once symlinks are followed.
    ///
    /// The path itself need not exist: the nearest existing ancestor is
    /// canonicalized and the missing components are appended to it, so a
    /// new file under a symlinked directory resolves to the link target.
    fn physical_form(&self, raw: &str, warnings: &mut Vec<String>) -> Option<NormalizedPath> {
        let on_disk = self.resolve_on_disk(raw);
        let mut missing: Vec<&OsStr> = Vec::new();
        let mut candidate: &Path = &on_disk;

        loop {
            if candidate.as_os_str().is_empty() {
                return None;
            }
            match self.probe.exists(candidate) {
                Ok(true) => break,
                Ok(false) => {
                    let (Some(name), Some(parent)) = (candidate.file_name(), candidate.parent()) else {
                        return None;
                    };
                    missing.push(name);
                    candidate = parent;
                }
                Err(e) => {
                    warnings.push(format!("could not inspect '{raw}': {e}"));
                    return None;
                }
            }
        }

        match self.probe.canonicalize(candidate) {
            Ok(mut resolved) => {
                resolved.extend(missing.iter().rev().copied());
                Some(NormalizedPath::from_path(&resolved))
            }
            Err(e) => {
                warnings.push(format!("could not resolve '{raw}': {e}"));
                None
            }
        }
    }

    /// The filesystem location a raw argument refers to.
    fn resolve_on_disk(&self, raw: &str) -> PathBuf {
        let lexical = NormalizedPath::parse(raw);
        match (&self.base_dir, lexical.is_relative()) {
            (Some(base), true) => PathBuf::from(lexical.resolved_against(base).to_string()),
            _ => PathBuf::from(raw.trim()),
        }
    }

    fn check_protected_paths(&self, action: &Action, warnings: &mut Vec<String>) -> Result<(), String> {
        for key in &self.config.path_arguments {
            let Some(raw) = action.arg_str(key) else { continue };
            if raw.trim().is_empty() {
                continue;
            }

            for form in self.path_forms(raw, warnings) {
                if let Some(protected) = self.protected_match(&form) {
                    return Err(format!(
                        "argument '{key}' = '{raw}' targets protected system path '{protected}'"
                    ));
                }
            }

            let lowered = raw.to_lowercase();
            if self
                .config
                .sensitive_markers
                .iter()
                .any(|marker| lowered.contains(&marker.to_lowercase()))
            {
                warnings.push(format!("sensitive path detected: {raw}"));
            }
        }
        Ok(())
    }

    fn check_destructive_overwrite(&self, action: &Action, warnings: &mut Vec<String>) -> Result<(), String> {
        if action.name != self.config.write_action {
            return Ok(());
        }
        let Some(filename) = action.arg_str(&self.config.write_target_argument) else {
            return Ok(());
        };
        if !self.config.is_source_file(filename) {
            return Ok(());
        }

        match self.probe.exists(&self.resolve_on_disk(filename)) {
            Ok(true) => Err(format!(
                "{} would overwrite existing source file '{}'; use {} with action='append' to add code instead",
                self.config.write_action, filename, self.config.modify_action
            )),
            Ok(false) => Ok(()),
            Err(e) => {
                warnings.push(format!("could not check whether '{filename}' exists: {e}"));
                Ok(())
            }
        }
    }

    fn check_root_deletion(&self, action: &Action) -> Result<(), String> {
        if action.name != self.config.delete_action {
            return Ok(());
        }
        let Some(raw) = action.arg_str(&self.config.delete_target_argument) else {
            return Ok(());
        };
        let target = raw.trim();
        if self.config.root_aliases.iter().any(|alias| alias == target) || is_drive_root(target) {
            return Err(format!(
                "refusing to delete filesystem root or current directory '{target}'"
            ));
        }
        Ok(())
    }

    fn check_required_arguments(&self, action: &Action) -> Result<(), String> {
        for key in self.config.required_for(&action.name) {
            if !action.has_arg(key) {
                return Err(format!("missing required argument '{}' for {}", key, action.name));
            }
        }
        Ok(())
    }

    fn collect_warnings(&self, action: &Action, warnings: &mut Vec<String>) {
        if action.name == self.config.delete_action {
            if let Some(raw) = action.arg_str(&self.config.delete_target_argument) {
                match self.probe.is_dir(&self.resolve_on_disk(raw)) {
                    Ok(true) => warnings.push(format!("deleting a directory: {raw}")),
                    Ok(false) => {}
                    Err(e) => warnings.push(format!("could not inspect '{raw}': {e}")),
                }
            }
        }

        if self.config.push_actions.contains(&action.name) {
            let branch = action
                .arg_str(&self.config.branch_argument)
                .filter(|b| !b.trim().is_empty())
                .unwrap_or(self.config.default_branch.as_str());
            if self.config.primary_branches.iter().any(|p| p == branch) {
                warnings.push(format!("pushing to primary branch '{branch}'"));
            }
        }
    }
}

impl RuleEngine for StaticRuleEngine {
    /// Run every check in order and stop at the first rejection.
    fn check(&self, action: &Action) -> ValidationVerdict {
        debug!(action = %action.name, "checking action against rule tables");

        let mut warnings = Vec::new();
        let outcome = self
            .check_protected_paths(action, &mut warnings)
            .and_then(|()| self.check_destructive_overwrite(action, &mut warnings))
            .and_then(|()| self.check_root_deletion(action))
            .and_then(|()| self.check_required_arguments(action));

        match outcome {
            Ok(()) => {
                self.collect_warnings(action, &mut warnings);
                debug!(action = %action.name, warnings = warnings.len(), "action passed rule checks");
                ValidationVerdict::approve(warnings)
            }
            Err(reason) => {
                warn!(action = %action.name, reason = %reason, "action rejected by rule");
                ValidationVerdict::reject(reason)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
