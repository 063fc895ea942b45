use std::sync::Arc;
use std::time::Duration;

use crate::config::{ProviderConfig, RetryConfig};
use crate::gateway::{CompletionGateway, OpenAIGateway, RetryGateway};
use crate::model::{PromptBundle, RecipeOption, RecipeOptions, RecipeRequest};
use crate::{generate_recipe, preview_prompts, validation, RecipeError};

/// Builder for configuring and running a single recipe generation
#[derive(Default)]
pub struct RecipeGeneratorBuilder {
    request: RecipeRequest,
    provider: ProviderConfig,
    retry: RetryConfig,
    gateway: Option<Arc<dyn CompletionGateway>>,
}

impl RecipeGeneratorBuilder {
    /// Set the comma-separated ingredient list
    ///
    /// # Example
    /// ```
    /// use senzu_kitchen::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .ingredients("chicken breast, rice, broccoli");
    /// ```
    pub fn ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.request.ingredients = ingredients.into();
        self
    }

    /// Set the dietary preference label (e.g. "High-Protein")
    pub fn dietary_preference(mut self, preference: impl Into<String>) -> Self {
        self.request.dietary_preference = preference.into();
        self
    }

    /// Set the fitness goal label (e.g. "Muscle Building")
    pub fn fitness_goal(mut self, goal: impl Into<String>) -> Self {
        self.request.fitness_goal = goal.into();
        self
    }

    /// Turn one optional section on or off
    ///
    /// # Example
    /// ```
    /// use senzu_kitchen::{RecipeGenerator, RecipeOption};
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .ingredients("salmon, quinoa")
    ///     .option(RecipeOption::NutritionalInformation, true)
    ///     .option(RecipeOption::StorageInstructions, true);
    /// ```
    pub fn option(mut self, option: RecipeOption, enabled: bool) -> Self {
        self.request.options.set(option, enabled);
        self
    }

    /// Replace all optional-section toggles at once
    pub fn options(mut self, options: RecipeOptions) -> Self {
        self.request.options = options;
        self
    }

    /// Start from an existing request
    pub fn request(mut self, request: RecipeRequest) -> Self {
        self.request = request;
        self
    }

    /// Set the API key used for the completion call
    ///
    /// The key is held only for the lifetime of this builder.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.provider.api_key = Some(key.into());
        self
    }

    /// Override the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.provider.model = model.into();
        self
    }

    /// Point the call at an OpenAI-compatible endpoint other than the default
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.provider.base_url = base_url.into();
        self
    }

    /// Set a timeout for the completion request
    ///
    /// # Example
    /// ```
    /// use senzu_kitchen::RecipeGenerator;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.provider.timeout_secs = duration.as_secs();
        self
    }

    /// Retry transient failures up to `attempts` total tries
    pub fn retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry = RetryConfig {
            attempts,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        };
        self
    }

    /// Use provider settings loaded from configuration
    pub fn provider_config(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    /// Use an already constructed gateway instead of building one
    pub fn gateway(mut self, gateway: Arc<dyn CompletionGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Validate the request and assemble its prompts without calling out
    ///
    /// # Errors
    /// Returns [`RecipeError::InsufficientIngredients`] when fewer than two
    /// ingredients were given.
    pub fn prompts(&self) -> Result<PromptBundle, RecipeError> {
        preview_prompts(&self.request)
    }

    /// Build and execute the recipe generation
    ///
    /// # Returns
    /// The HTML recipe text exactly as the model produced it
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - Fewer than two ingredients were given
    /// - No API key was set and no gateway was supplied
    /// - The completion call fails or returns no choices
    ///
    /// # Example
    /// ```no_run
    /// # use senzu_kitchen::RecipeGenerator;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipe = RecipeGenerator::builder()
    ///     .ingredients("chicken breast, rice, broccoli")
    ///     .dietary_preference("High-Protein")
    ///     .fitness_goal("Muscle Building")
    ///     .api_key("sk-...")
    ///     .generate()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(self) -> Result<String, RecipeError> {
        // Ingredient count is reported ahead of a missing credential
        validation::validate_request(&self.request)?;

        let gateway: Arc<dyn CompletionGateway> = match self.gateway {
            Some(gateway) => gateway,
            None => {
                let openai = OpenAIGateway::new(&self.provider)?;
                if self.retry.attempts > 1 {
                    Arc::new(RetryGateway::new(
                        openai,
                        self.retry.attempts,
                        self.retry.delay_ms,
                    ))
                } else {
                    Arc::new(openai)
                }
            }
        };

        generate_recipe(&self.request, gateway.as_ref()).await
    }
}

/// Main entry point for the builder API
pub struct RecipeGenerator;

impl RecipeGenerator {
    /// Creates a new builder for generating a recipe
    ///
    /// # Example
    /// ```
    /// use senzu_kitchen::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder();
    /// ```
    pub fn builder() -> RecipeGeneratorBuilder {
        RecipeGeneratorBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insufficient_ingredients_checked_before_credential() {
        let result = RecipeGenerator::builder()
            .ingredients("chicken")
            .generate()
            .await;
        assert!(matches!(
            result,
            Err(RecipeError::InsufficientIngredients { found: 1 })
        ));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let result = RecipeGenerator::builder()
            .ingredients("chicken, rice")
            .generate()
            .await;
        assert!(matches!(result, Err(RecipeError::MissingCredential)));
    }

    #[test]
    fn test_prompts_reflect_options() {
        let bundle = RecipeGenerator::builder()
            .ingredients("tofu, broccoli")
            .dietary_preference("Vegan")
            .fitness_goal("Fat Loss")
            .option(RecipeOption::StorageInstructions, true)
            .option(RecipeOption::RequiredEquipment, true)
            .option(RecipeOption::RequiredEquipment, false)
            .prompts()
            .unwrap();

        assert!(bundle.system_prompt().contains("storage-section"));
        assert!(!bundle.system_prompt().contains("equipment-section"));
        assert!(bundle
            .user_prompt()
            .contains("- Optional Sections: storageInstructions\n"));
    }

    #[test]
    fn test_builder_settings() {
        let builder = RecipeGenerator::builder()
            .api_key("sk-test")
            .model("gpt-4o")
            .timeout(Duration::from_secs(15))
            .retry(3, Duration::from_millis(250));
        assert_eq!(builder.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(builder.provider.model, "gpt-4o");
        assert_eq!(builder.provider.timeout_secs, 15);
        assert_eq!(builder.retry.attempts, 3);
        assert_eq!(builder.retry.delay_ms, 250);
    }

    #[test]
    fn test_retry_delay_saturates() {
        let builder = RecipeGenerator::builder().retry(2, Duration::MAX);
        assert_eq!(builder.retry.delay_ms, u64::MAX);
    }
}
