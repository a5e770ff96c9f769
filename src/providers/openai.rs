use crate::config::BackendConfig;
use crate::error::Result;
use crate::router::{BackendError, ChatBackend, ChatTurn};

use super::ChatCompletionsClient;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI chat completion. Constructed even without a key, in which case
/// every call fails with a missing-credential error.
#[derive(Clone)]
pub struct OpenAiBackend {
    client: ChatCompletionsClient,
}

impl OpenAiBackend {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client =
            ChatCompletionsClient::new(config, DEFAULT_ENDPOINT, DEFAULT_MODEL, "OPENAI_API_KEY")?;
        Ok(Self { client })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiBackend {
    async fn generate(&self, turns: &[ChatTurn]) -> std::result::Result<String, BackendError> {
        self.client.complete(turns).await
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}
