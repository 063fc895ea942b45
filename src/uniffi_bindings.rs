//! UniFFI bindings for senzu-kitchen
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::model::{RecipeOptions, RecipeRequest, DIETARY_PREFERENCES, FITNESS_GOALS};
use crate::{render, RecipeError, RecipeGenerator};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible optional-section toggles
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeOptions {
    pub nutritional_information: bool,
    pub required_equipment: bool,
    pub tips_and_variations: bool,
    pub storage_instructions: bool,
}

impl From<FfiRecipeOptions> for RecipeOptions {
    fn from(ffi: FfiRecipeOptions) -> Self {
        RecipeOptions {
            nutritional_information: ffi.nutritional_information,
            required_equipment: ffi.required_equipment,
            tips_and_variations: ffi.tips_and_variations,
            storage_instructions: ffi.storage_instructions,
        }
    }
}

/// FFI-compatible recipe request, as collected from the form controls
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeRequest {
    /// Comma-separated ingredients
    pub ingredients: String,
    pub dietary_preference: String,
    pub fitness_goal: String,
    pub options: FfiRecipeOptions,
}

impl From<FfiRecipeRequest> for RecipeRequest {
    fn from(ffi: FfiRecipeRequest) -> Self {
        RecipeRequest::new(
            ffi.ingredients,
            ffi.dietary_preference,
            ffi.fitness_goal,
            ffi.options.into(),
        )
    }
}

/// FFI-compatible prompt pair
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiPromptBundle {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiRecipeError {
    /// Fewer than two ingredients were given
    InsufficientIngredients { message: String },
    /// No API key was supplied
    MissingCredential { message: String },
    /// The completion request failed before a response arrived
    TransportError { message: String },
    /// The completion endpoint returned a non-success status
    UpstreamStatusError { code: u16, message: String },
    /// The completion endpoint returned no choices
    EmptyCompletion { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiRecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiRecipeError::InsufficientIngredients { message } => {
                write!(f, "Insufficient ingredients: {}", message)
            }
            FfiRecipeError::MissingCredential { message } => {
                write!(f, "Missing credential: {}", message)
            }
            FfiRecipeError::TransportError { message } => write!(f, "Transport error: {}", message),
            FfiRecipeError::UpstreamStatusError { code, message } => {
                write!(f, "Upstream error ({}): {}", code, message)
            }
            FfiRecipeError::EmptyCompletion { message } => write!(f, "Empty completion: {}", message),
            FfiRecipeError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiRecipeError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiRecipeError {}

impl From<RecipeError> for FfiRecipeError {
    fn from(err: RecipeError) -> Self {
        let message = err.user_message();
        match err {
            RecipeError::InsufficientIngredients { .. } => {
                FfiRecipeError::InsufficientIngredients { message }
            }
            RecipeError::MissingCredential => FfiRecipeError::MissingCredential { message },
            RecipeError::Transport(_) => FfiRecipeError::TransportError { message },
            RecipeError::UpstreamStatus { code, .. } => {
                FfiRecipeError::UpstreamStatusError { code, message }
            }
            RecipeError::EmptyCompletion => FfiRecipeError::EmptyCompletion { message },
            RecipeError::Config(_) => FfiRecipeError::ConfigError { message },
            RecipeError::Runtime(_) => FfiRecipeError::RuntimeError { message },
        }
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, RecipeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RecipeError::Runtime(format!("Failed to create async runtime: {}", e)))
}

/// A front-end session holding the credential it was opened with.
///
/// The key is supplied once and reused for every generation until the
/// session is dropped; it is never persisted.
#[derive(Debug)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct RecipeSession {
    provider: ProviderConfig,
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl RecipeSession {
    /// Open a session
    ///
    /// # Arguments
    /// * `api_key` - Credential for the completion API
    /// * `model` - Optional model name (uses the default if not specified)
    /// * `timeout_seconds` - Optional request timeout
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn new(api_key: String, model: Option<String>, timeout_seconds: Option<u64>) -> Arc<Self> {
        let mut provider = ProviderConfig::with_api_key(api_key);
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            provider.model = model;
        }
        if let Some(timeout) = timeout_seconds {
            provider.timeout_secs = timeout;
        }
        Arc::new(RecipeSession { provider })
    }

    /// Generate a recipe, returning the model's HTML
    pub fn generate(&self, request: FfiRecipeRequest) -> Result<String, FfiRecipeError> {
        self.run(request).map_err(FfiRecipeError::from)
    }

    /// Generate a recipe, returning either its HTML or an error block ready
    /// to be placed in the recipe output area
    pub fn generate_html(&self, request: FfiRecipeRequest) -> String {
        match self.run(request) {
            Ok(html) => html,
            Err(err) => render::error_html(&err),
        }
    }
}

impl RecipeSession {
    fn run(&self, request: FfiRecipeRequest) -> Result<String, RecipeError> {
        let request: RecipeRequest = request.into();
        let rt = create_runtime()?;
        rt.block_on(
            RecipeGenerator::builder()
                .request(request)
                .provider_config(self.provider.clone())
                .generate(),
        )
    }
}

/// Validate a request and return the prompts that would be sent for it
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn assemble_prompts(request: FfiRecipeRequest) -> Result<FfiPromptBundle, FfiRecipeError> {
    let bundle = crate::preview_prompts(&request.into())?;
    Ok(FfiPromptBundle {
        system_prompt: bundle.system_prompt().to_string(),
        user_prompt: bundle.user_prompt().to_string(),
    })
}

/// Dietary preference labels, in display order
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn dietary_preferences() -> Vec<String> {
    DIETARY_PREFERENCES.iter().map(|s| s.to_string()).collect()
}

/// Fitness goal labels, in display order
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn fitness_goals() -> Vec<String> {
    FITNESS_GOALS.iter().map(|s| s.to_string()).collect()
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
