//! # warden-semantic
//!
//! The optional second opinion in WARDEN: a small completion model reviews
//! high-risk actions and plans after the rule engine has accepted them.
//!
//! [`CompletionChecker`] implements
//! [`SemanticChecker`](warden_core::traits::SemanticChecker) over any
//! [`TextCompletion`] backend. [`HttpCompletion`] is the stock backend for a
//! local OpenAI-compatible server.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use warden_semantic::{CompletionChecker, SemanticConfig};
//!
//! let checker = CompletionChecker::http(SemanticConfig {
//!     enabled: true,
//!     endpoint: "http://127.0.0.1:8080".to_string(),
//!     ..SemanticConfig::default()
//! });
//! let validator = validator.with_semantic(Box::new(checker));
//! ```
//!
//! The checker never rejects on its own failures: a backend that cannot
//! load, times out, or answers off-grammar yields an `Err` that the
//! validator turns into a warning.

pub mod checker;
pub mod completion;
pub mod config;
pub mod grammar;
pub mod http;

pub use checker::{BackendLoader, CompletionChecker};
pub use completion::{CompletionRequest, TextCompletion};
pub use config::SemanticConfig;
pub use http::HttpCompletion;
