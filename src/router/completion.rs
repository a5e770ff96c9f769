use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

use super::traits::{ChatBackend, ChatTurn};

/// Classification of a failed completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    BackendError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::BackendError => f.write_str("BackendError"),
        }
    }
}

/// Outcome of a single completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionResult {
    Success { text: String },
    Failure { kind: FailureKind, message: String },
}

impl CompletionResult {
    pub fn backend_error(message: impl Into<String>) -> Self {
        CompletionResult::Failure {
            kind: FailureKind::BackendError,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success { .. })
    }
}

/// Sends conversations to the backend chosen at startup.
///
/// Cloning is cheap and every clone talks to the same backend, so one router
/// can be shared by all request handlers.
#[derive(Clone)]
pub struct CompletionRouter {
    backend: Arc<dyn ChatBackend>,
}

impl CompletionRouter {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Ask the backend for one completion. Never retries and never tries the
    /// other backend; every error becomes a `BackendError` failure.
    pub async fn complete(&self, turns: &[ChatTurn]) -> CompletionResult {
        let backend = self.backend.name();

        if turns.is_empty() {
            error!(backend, "Refusing to send an empty conversation");
            return CompletionResult::backend_error(format!(
                "{} Error: conversation must contain at least one turn",
                backend
            ));
        }

        match self.backend.generate(turns).await {
            Ok(text) => {
                debug!(backend, chars = text.len(), "Completion received");
                CompletionResult::Success { text }
            }
            Err(e) => {
                error!(backend, error = %e, "{} error", backend);
                CompletionResult::backend_error(format!("{} Error: {}", backend, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::traits::BackendError;

    struct FixedBackend(&'static str);

    #[async_trait::async_trait]
    impl ChatBackend for FixedBackend {
        async fn generate(&self, _turns: &[ChatTurn]) -> Result<String, BackendError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &'static str {
            "Fixed"
        }
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::BackendError.to_string(), "BackendError");
    }

    #[test]
    fn test_empty_conversation_is_a_backend_error() {
        let router = CompletionRouter::new(Arc::new(FixedBackend("unused")));
        let result = tokio_test::block_on(router.complete(&[]));

        match result {
            CompletionResult::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::BackendError);
                assert!(message.contains("at least one turn"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_result_serialization() {
        let value = serde_json::to_value(CompletionResult::backend_error("boom")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "failure", "kind": "BackendError", "message": "boom"})
        );
    }

    #[test]
    fn test_success_passes_text_through() {
        let router = CompletionRouter::new(Arc::new(FixedBackend("Hi there")));
        let result = tokio_test::block_on(router.complete(&[ChatTurn::user("Hello")]));

        assert!(result.is_success());
        assert_eq!(
            result,
            CompletionResult::Success {
                text: "Hi there".to_string()
            }
        );
    }
}
