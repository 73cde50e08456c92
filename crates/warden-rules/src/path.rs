//! Lexical path normalization for deny-list comparison.
//!
//! Tool arguments arrive as raw strings written for whatever platform the
//! planner model had in mind, so normalization works on text rather than
//! `std::path`: both separators are accepted, drive letters are recognized
//! on every host, and `.`/`..` are resolved without touching the disk.
//! Symlinks are handled by the caller, which also compares the canonical
//! form of paths that exist.

use std::fmt;
use std::path::Path;

/// Where a normalized path is anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Root {
    /// Relative to some working directory.
    Relative,
    /// POSIX root `/`.
    Slash,
    /// Windows drive, stored upper-case (`"C:"`).
    Drive(String),
}

/// A path reduced to a root and a list of plain components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    root: Root,
    components: Vec<String>,
}

impl NormalizedPath {
    /// Normalize a raw path string.
    ///
    /// `\` and `/` are equivalent, empty and `.` components vanish, and `..`
    /// removes the previous component. `..` above an absolute root is
    /// dropped; above a relative start it is kept.
    pub fn parse(raw: &str) -> Self {
        let unified = raw.trim().replace('\\', "/");
        // Windows verbatim prefix, as produced by canonicalize on Windows.
        let unified = unified.strip_prefix("//?/").unwrap_or(&unified);

        let bytes = unified.as_bytes();
        let (root, rest) = if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            (Root::Drive(unified[..2].to_ascii_uppercase()), &unified[2..])
        } else if unified.starts_with('/') {
            (Root::Slash, unified)
        } else {
            (Root::Relative, unified)
        };

        let mut path = Self { root, components: Vec::new() };
        path.push_all(rest);
        path
    }

    /// Normalize a `std::path::Path`.
    pub fn from_path(path: &Path) -> Self {
        Self::parse(&path.to_string_lossy())
    }

    pub fn is_relative(&self) -> bool {
        self.root == Root::Relative
    }

    fn has_drive(&self) -> bool {
        matches!(self.root, Root::Drive(_))
    }

    fn push_all(&mut self, rest: &str) {
        for part in rest.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    let can_pop = self.components.last().is_some_and(|last| last != "..");
                    if can_pop {
                        self.components.pop();
                    } else if self.is_relative() {
                        self.components.push("..".to_string());
                    }
                }
                other => self.components.push(other.to_string()),
            }
        }
    }

    /// Resolve a relative path against `base`. Absolute paths are returned
    /// unchanged.
    pub fn resolved_against(&self, base: &NormalizedPath) -> NormalizedPath {
        if !self.is_relative() {
            return self.clone();
        }
        let mut joined = base.clone();
        joined.push_all(&self.components.join("/"));
        joined
    }

    /// True if `self` equals `base` or is nested under it.
    ///
    /// Comparison is component-wise, so `C:\Windows` contains
    /// `C:\Windows\System32` but not `C:\WindowsApps`. Drive-letter paths
    /// always compare case-insensitively; others only when `fold_case`.
    pub fn starts_with(&self, base: &NormalizedPath, fold_case: bool) -> bool {
        if self.root != base.root || base.components.len() > self.components.len() {
            return false;
        }
        let fold = fold_case || self.has_drive();
        self.components
            .iter()
            .zip(&base.components)
            .all(|(ours, theirs)| {
                if fold {
                    ours.eq_ignore_ascii_case(theirs)
                } else {
                    ours == theirs
                }
            })
    }

    /// True if this is a bare filesystem root (`/`, `C:\`).
    pub fn is_root(&self) -> bool {
        !self.is_relative() && self.components.is_empty()
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.components.join("/");
        match &self.root {
            Root::Relative if joined.is_empty() => write!(f, "."),
            Root::Relative => write!(f, "{joined}"),
            Root::Slash => write!(f, "/{joined}"),
            Root::Drive(drive) => write!(f, "{drive}/{joined}"),
        }
    }
}

/// True if `raw` names a bare drive root: `X:`, `X:\` or `X:/`.
pub fn is_drive_root(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    match bytes.len() {
        2 | 3 => {
            bytes[0].is_ascii_alphabetic()
                && bytes[1] == b':'
                && (bytes.len() == 2 || bytes[2] == b'\\' || bytes[2] == b'/')
        }
        _ => false,
    }
}
