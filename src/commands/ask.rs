use tracing::info;

use crate::config::Config;
use crate::router::{BackendFactory, CompletionResult, CompletionRouter};
use crate::server::personas::Persona;
use crate::{Result, SahayakError};

/// Send one prompt through the configured backend and return the answer
pub async fn handle_ask_command(config: &Config, persona: Persona, input: &str) -> Result<String> {
    let (selector, router) = BackendFactory::create_router(&config.backends)?;
    info!(persona = persona.name(), backend = %selector, "Asking from the command line");
    ask(&router, persona, input).await
}

pub async fn ask(router: &CompletionRouter, persona: Persona, input: &str) -> Result<String> {
    match router.complete(&persona.conversation(input)).await {
        CompletionResult::Success { text } => Ok(text),
        CompletionResult::Failure { message, .. } => Err(SahayakError::Backend(message)),
    }
}
