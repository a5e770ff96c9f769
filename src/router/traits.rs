use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation, in the order it was spoken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Everything that can go wrong while asking a backend for a completion
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("missing API key (set {0})")]
    MissingCredential(&'static str),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no completion text")]
    EmptyCompletion,
}

/// A text-generation service able to produce one completion for a conversation
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Generate a single completion for `turns` and return its text
    async fn generate(&self, turns: &[ChatTurn]) -> Result<String, BackendError>;

    /// Short tag used in logs and failure messages
    fn name(&self) -> &'static str;
}
