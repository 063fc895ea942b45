//! Fitness-focused recipe generation.
//!
//! A request (ingredients, dietary preference, fitness goal, optional
//! sections) is validated, turned into a system/user prompt pair and sent to
//! an OpenAI-compatible chat completion endpoint. The model's HTML answer is
//! returned untouched.
//!
//! Two deployment shapes share this library: in-process callers use
//! [`RecipeGenerator`] (or the FFI bindings), while browser front-ends talk
//! to the HTTP service in [`server`].

pub mod builder;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod prompt;
pub mod render;
pub mod server;
pub mod uniffi_bindings;
pub mod validation;

use log::debug;

pub use builder::{RecipeGenerator, RecipeGeneratorBuilder};
pub use config::AppConfig;
pub use error::{ErrorKind, RecipeError};
pub use gateway::{CompletionGateway, OpenAIGateway, RetryGateway};
pub use model::{
    PromptBundle, RecipeOption, RecipeOptions, RecipeRequest, DIETARY_PREFERENCES, FITNESS_GOALS,
};

/// Validate a request, assemble its prompts and run them through `gateway`.
///
/// Nothing is sent when validation fails.
pub async fn generate_recipe(
    request: &RecipeRequest,
    gateway: &dyn CompletionGateway,
) -> Result<String, RecipeError> {
    validation::validate_request(request)?;
    let prompts = prompt::assemble(request);
    let recipe = gateway.complete(&prompts).await?;
    debug!("Received {} bytes of recipe HTML", recipe.len());
    Ok(recipe)
}

/// Validate a request and return the prompts that would be sent for it.
pub fn preview_prompts(request: &RecipeRequest) -> Result<PromptBundle, RecipeError> {
    validation::validate_request(request)?;
    Ok(prompt::assemble(request))
}

/// Generate a recipe with settings from `config.toml` and the environment.
///
/// # Example
/// ```no_run
/// use senzu_kitchen::{generate_with_config, AppConfig, RecipeRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::load()?;
/// let request = RecipeRequest::new("eggs, spinach", "Vegetarian", "Fat Loss", Default::default());
/// let html = generate_with_config(&request, &config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn generate_with_config(
    request: &RecipeRequest,
    config: &AppConfig,
) -> Result<String, RecipeError> {
    validation::validate_request(request)?;
    let gateway = gateway::from_config(config)?;
    generate_recipe(request, gateway.as_ref()).await
}
