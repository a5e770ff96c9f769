use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::BackendsConfig,
    error::Result,
    providers::{huggingface::HuggingFaceBackend, openai::OpenAiBackend},
    router::{ChatBackend, CompletionRouter},
};

/// Which backend serves completions for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSelector {
    HuggingFace,
    OpenAi,
}

impl BackendSelector {
    /// Hugging Face takes priority whenever its credential is configured,
    /// even if an OpenAI key is present as well.
    pub fn from_config(config: &BackendsConfig) -> Self {
        if config.huggingface.credential().is_some() {
            BackendSelector::HuggingFace
        } else {
            BackendSelector::OpenAi
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendSelector::HuggingFace => "huggingface",
            BackendSelector::OpenAi => "openai",
        }
    }
}

impl fmt::Display for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend factory for creating the completion router from configuration
pub struct BackendFactory;

impl BackendFactory {
    pub fn create_backend(
        selector: BackendSelector,
        config: &BackendsConfig,
    ) -> Result<Arc<dyn ChatBackend>> {
        let backend: Arc<dyn ChatBackend> = match selector {
            BackendSelector::HuggingFace => {
                Arc::new(HuggingFaceBackend::from_config(&config.huggingface)?)
            }
            BackendSelector::OpenAi => {
                if config.openai.credential().is_none() {
                    warn!("No HF_API_TOKEN or OPENAI_API_KEY configured; completions will fail");
                }
                Arc::new(OpenAiBackend::from_config(&config.openai)?)
            }
        };
        Ok(backend)
    }

    /// Evaluate the selector once and wrap the chosen backend in a router
    pub fn create_router(config: &BackendsConfig) -> Result<(BackendSelector, CompletionRouter)> {
        let selector = BackendSelector::from_config(config);
        let backend = Self::create_backend(selector, config)?;
        info!(backend = %selector, "Completion backend selected");
        Ok((selector, CompletionRouter::new(backend)))
    }
}
