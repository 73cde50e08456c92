//! # warden-core
//!
//! The validation pipeline for WARDEN.
//!
//! This crate provides:
//! - The trait seams (`RuleEngine`, `SemanticChecker`, `FileProbe`, `ToolRunner`)
//! - The `Validator` that runs rules first and semantic review second
//! - The `PlanExecutor` that runs only what a verdict allows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::{Validator, PlanExecutor};
//!
//! let validator = Validator::new(Box::new(rule_engine), risk_profile);
//! let verdict = validator.validate_plan(&plan, "tidy my desktop");
//! let report = PlanExecutor::new(Box::new(tools)).execute(&verdict);
//! ```

pub mod executor;
pub mod traits;
pub mod validator;

pub use executor::PlanExecutor;
pub use validator::Validator;
