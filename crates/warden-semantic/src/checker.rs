//! `SemanticChecker` built on any `TextCompletion` backend.
//!
//! The backend is loaded lazily, at most once, on the first availability
//! check. A failed load leaves the checker unavailable for the rest of the
//! process and is reported once. Each call then runs on its own worker
//! thread and is abandoned if it outlives `timeout_ms`.

use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use warden_contracts::{
    action::{Action, Plan},
    error::{WardenError, WardenResult},
    semantic::SemanticVerdict,
};
use warden_core::traits::SemanticChecker;

use crate::completion::{CompletionRequest, TextCompletion};
use crate::config::SemanticConfig;
use crate::grammar;
use crate::http::HttpCompletion;

/// Produces the completion backend. Called at most once.
pub type BackendLoader = Box<dyn Fn() -> WardenResult<Arc<dyn TextCompletion>> + Send + Sync>;

/// A semantic checker that asks a completion model for a one-line verdict.
pub struct CompletionChecker {
    config: SemanticConfig,
    loader: BackendLoader,
    /// `None` inside means the load was attempted and failed.
    backend: OnceLock<Option<Arc<dyn TextCompletion>>>,
}

impl CompletionChecker {
    pub fn new(config: SemanticConfig, loader: BackendLoader) -> Self {
        Self {
            config,
            loader,
            backend: OnceLock::new(),
        }
    }

    /// A checker over an already-constructed backend.
    pub fn with_backend(config: SemanticConfig, backend: Arc<dyn TextCompletion>) -> Self {
        Self::new(config, Box::new(move || Ok(Arc::clone(&backend))))
    }

    /// A checker whose backend is the HTTP completion server named in
    /// `config.endpoint`, connected on first use.
    pub fn http(config: SemanticConfig) -> Self {
        let settings = config.clone();
        Self::new(
            config,
            Box::new(move || -> WardenResult<Arc<dyn TextCompletion>> {
                Ok(Arc::new(HttpCompletion::connect(&settings)?))
            }),
        )
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.config
    }

    fn backend(&self) -> Option<&Arc<dyn TextCompletion>> {
        self.backend
            .get_or_init(|| match (self.loader)() {
                Ok(backend) => {
                    debug!("semantic backend loaded");
                    Some(backend)
                }
                Err(e) => {
                    info!(error = %e, "semantic checker unavailable; validating with rules only");
                    None
                }
            })
            .as_ref()
    }

    fn request(&self, prompt: String, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            prompt,
            max_tokens,
            temperature: self.config.temperature,
            stop: self.config.stop.clone(),
        }
    }

    /// Run one completion on a worker thread, bounded by `timeout_ms`, and
    /// parse the answer.
    fn ask(&self, request: CompletionRequest) -> WardenResult<SemanticVerdict> {
        let backend = self
            .backend()
            .cloned()
            .ok_or_else(|| WardenError::SemanticUnavailable {
                reason: "backend failed to load".to_string(),
            })?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(backend.complete(&request));
        });

        let timeout_ms = self.config.timeout_ms;
        let output = match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
            Ok(result) => result?,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(timeout_ms, "semantic call timed out");
                return Err(WardenError::SemanticTimeout { timeout_ms });
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(WardenError::CompletionFailed {
                    reason: "completion worker exited without an answer".to_string(),
                });
            }
        };

        debug!(output = %output.trim(), "semantic checker answered");
        grammar::parse_answer(&output)
    }
}

impl SemanticChecker for CompletionChecker {
    fn is_available(&self) -> bool {
        self.backend().is_some()
    }

    fn review_action(&self, action: &Action, user_request: &str) -> WardenResult<SemanticVerdict> {
        let prompt = grammar::action_prompt(action, user_request);
        self.ask(self.request(prompt, self.config.action_max_tokens))
    }

    fn review_plan(&self, plan: &Plan, user_request: &str) -> WardenResult<SemanticVerdict> {
        let prompt = grammar::plan_prompt(plan, user_request);
        self.ask(self.request(prompt, self.config.plan_max_tokens))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use serde_json::json;

    use warden_contracts::{
        action::{Action, Plan},
        error::{WardenError, WardenResult},
        semantic::SemanticVerdict,
    };
    use warden_core::traits::SemanticChecker;

    use crate::completion::{CompletionRequest, TextCompletion};
    use crate::config::SemanticConfig;

    use super::CompletionChecker;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Answers with a fixed string after an optional delay and keeps the last
    /// request it saw.
    struct MockCompletion {
        answer: String,
        delay: Duration,
        last: Mutex<Option<CompletionRequest>>,
    }

    impl MockCompletion {
        fn answering(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.to_string(),
                delay: Duration::ZERO,
                last: Mutex::new(None),
            })
        }

        fn slow(answer: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.to_string(),
                delay,
                last: Mutex::new(None),
            })
        }
    }

    impl TextCompletion for MockCompletion {
        fn complete(&self, request: &CompletionRequest) -> WardenResult<String> {
            *self.last.lock().unwrap() = Some(request.clone());
            thread::sleep(self.delay);
            Ok(self.answer.clone())
        }
    }

    fn push() -> Action {
        Action::new("git_push", json!({ "commit_message": "fix", "branch": "main" }))
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    #[test]
    fn test_loader_runs_once_even_when_it_fails() {
        let loads = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&loads);
        let checker = CompletionChecker::new(
            SemanticConfig::default(),
            Box::new(move || -> WardenResult<Arc<dyn TextCompletion>> {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(WardenError::SemanticUnavailable { reason: "no model".to_string() })
            }),
        );

        assert!(!checker.is_available());
        assert!(!checker.is_available());
        assert!(matches!(
            checker.review_action(&push(), "push"),
            Err(WardenError::SemanticUnavailable { .. })
        ));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let loads = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&loads);
        let backend = MockCompletion::answering("APPROVED");
        let checker = Arc::new(CompletionChecker::new(
            SemanticConfig::default(),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                Ok(backend.clone() as Arc<dyn TextCompletion>)
            }),
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let checker = Arc::clone(&checker);
                thread::spawn(move || checker.is_available())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    // ── Calls ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_action_review_uses_action_budget() {
        let backend = MockCompletion::answering("WARNING: pushes straight to main");
        let checker = CompletionChecker::with_backend(SemanticConfig::default(), backend.clone());

        let verdict = checker.review_action(&push(), "push my fix").unwrap();

        assert_eq!(
            verdict,
            SemanticVerdict::Warning { message: "pushes straight to main".to_string() }
        );
        let request = backend.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.max_tokens, 100);
        assert!((request.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(request.stop, vec!["\n\n", "User:", "<think>"]);
        assert!(request.prompt.contains("Tool: git_push"));
    }

    #[test]
    fn test_plan_review_uses_plan_budget() {
        let backend = MockCompletion::answering("<think>hmm</think>\nSUGGEST: run tests first");
        let checker = CompletionChecker::with_backend(SemanticConfig::default(), backend.clone());
        let plan = Plan::new(vec![push()], "ship");

        let verdict = checker.review_plan(&plan, "ship it").unwrap();

        assert_eq!(
            verdict,
            SemanticVerdict::Suggest { suggestion: "run tests first".to_string() }
        );
        assert_eq!(backend.last.lock().unwrap().as_ref().unwrap().max_tokens, 150);
    }

    #[test]
    fn test_slow_backend_times_out() {
        let config = SemanticConfig { timeout_ms: 20, ..SemanticConfig::default() };
        let checker = CompletionChecker::with_backend(
            config,
            MockCompletion::slow("APPROVED", Duration::from_millis(500)),
        );

        match checker.review_action(&push(), "push") {
            Err(WardenError::SemanticTimeout { timeout_ms }) => assert_eq!(timeout_ms, 20),
            other => panic!("expected SemanticTimeout, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_answer_is_an_error() {
        let checker = CompletionChecker::with_backend(
            SemanticConfig::default(),
            MockCompletion::answering("I think this is probably fine."),
        );

        assert!(matches!(
            checker.review_action(&push(), "push"),
            Err(WardenError::SemanticUnparseable { .. })
        ));
    }
}
