use std::fmt;

use thiserror::Error;

/// Message shown when a failure carries no usable text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "There was a problem creating your recipe. Please try again with different ingredients.";

/// Errors that can occur while generating a recipe.
///
/// Every variant is terminal for the request that produced it.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Fewer than two ingredients survived splitting and trimming
    #[error("Please provide at least two ingredients for a better recipe suggestion (found {found}).")]
    InsufficientIngredients { found: usize },

    /// No credential was supplied for the completion API
    #[error("An OpenAI API key is required to generate recipes.")]
    MissingCredential,

    /// The request never produced a usable HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The completion endpoint answered with a non-success status
    #[error("{message}")]
    UpstreamStatus { code: u16, message: String },

    /// The completion endpoint returned no choices
    #[error("No recipe generated. Please try again with different ingredients.")]
    EmptyCompletion,

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Async runtime could not be created or joined
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Failure classification exposed to callers and front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InsufficientIngredients,
    MissingCredential,
    TransportError,
    UpstreamStatusError,
    EmptyCompletion,
    Configuration,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InsufficientIngredients => "InsufficientIngredients",
            ErrorKind::MissingCredential => "MissingCredential",
            ErrorKind::TransportError => "TransportError",
            ErrorKind::UpstreamStatusError => "UpstreamStatusError",
            ErrorKind::EmptyCompletion => "EmptyCompletion",
            ErrorKind::Configuration => "Configuration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RecipeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecipeError::InsufficientIngredients { .. } => ErrorKind::InsufficientIngredients,
            RecipeError::MissingCredential => ErrorKind::MissingCredential,
            RecipeError::Transport(_) | RecipeError::Runtime(_) => ErrorKind::TransportError,
            RecipeError::UpstreamStatus { .. } => ErrorKind::UpstreamStatusError,
            RecipeError::EmptyCompletion => ErrorKind::EmptyCompletion,
            RecipeError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Upstream HTTP status, if the failure came from one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RecipeError::UpstreamStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for failures detected before any network call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RecipeError::InsufficientIngredients { .. } | RecipeError::MissingCredential
        )
    }

    /// Message suitable for showing to the person who asked for the recipe.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for RecipeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RecipeError::Transport(format!("request timed out: {}", err))
        } else {
            RecipeError::Transport(err.to_string())
        }
    }
}
