//! # warden-contracts
//!
//! Shared types, verdicts, and error contracts for the WARDEN validation
//! layer.
//!
//! All crates in the workspace import from here. No validation logic lives
//! in this crate, only data definitions, constructors, and error types.

pub mod action;
pub mod error;
pub mod execution;
pub mod risk;
pub mod semantic;
pub mod verdict;
