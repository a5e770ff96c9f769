use crate::config::BackendConfig;
use crate::error::Result;
use crate::router::{BackendError, ChatBackend, ChatTurn};

use super::ChatCompletionsClient;

pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3";

/// Hugging Face inference chat completion
#[derive(Clone)]
pub struct HuggingFaceBackend {
    client: ChatCompletionsClient,
}

impl HuggingFaceBackend {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client =
            ChatCompletionsClient::new(config, DEFAULT_ENDPOINT, DEFAULT_MODEL, "HF_API_TOKEN")?;
        Ok(Self { client })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait::async_trait]
impl ChatBackend for HuggingFaceBackend {
    async fn generate(&self, turns: &[ChatTurn]) -> std::result::Result<String, BackendError> {
        self.client.complete(turns).await
    }

    fn name(&self) -> &'static str {
        "HF"
    }
}
