mod open_ai;
mod retry;

pub use open_ai::OpenAIGateway;
pub use retry::RetryGateway;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::model::PromptBundle;

/// Outbound side of recipe generation: sends assembled prompts to a
/// completion service and returns the text it produced.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Short name used in logs (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Issue one completion request for the given prompts.
    ///
    /// The returned text is the first choice's message content, untouched.
    async fn complete(&self, prompts: &PromptBundle) -> Result<String, RecipeError>;
}

/// Build the gateway described by the configuration.
///
/// Fails with [`RecipeError::MissingCredential`] when no API key is set.
/// The OpenAI gateway is wrapped in a [`RetryGateway`] only when more than
/// one attempt is configured.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn CompletionGateway>, RecipeError> {
    let gateway = OpenAIGateway::new(&config.provider)?;
    if config.retry.attempts > 1 {
        Ok(Arc::new(RetryGateway::new(
            gateway,
            config.retry.attempts,
            config.retry.delay_ms,
        )))
    } else {
        Ok(Arc::new(gateway))
    }
}
