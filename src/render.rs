//! HTML fragments for front-ends that drop the result straight into a page.
//!
//! Completion text is passed through untouched; only error blocks are built
//! here, with their message HTML-escaped.

use html_escape::encode_text;

use crate::error::{ErrorKind, RecipeError, GENERIC_FAILURE_MESSAGE};

/// Heading shown above the message for each kind of failure
pub fn error_title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InsufficientIngredients => "Insufficient Ingredients",
        ErrorKind::MissingCredential => "API Key Required",
        _ => "Error Generating Recipe",
    }
}

/// Render a failure as the `error-message` block used by the recipe page.
pub fn error_html(err: &RecipeError) -> String {
    let message = match err {
        // The count is an implementation detail; keep the page copy short
        RecipeError::InsufficientIngredients { .. } => {
            "Please provide at least two ingredients for a better recipe suggestion.".to_string()
        }
        _ => err.user_message(),
    };
    error_block(error_title(err.kind()), &message)
}

fn error_block(title: &str, message: &str) -> String {
    let message = if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE
    } else {
        message
    };
    format!(
        "<div class=\"error-message\">\n  <h2>{}</h2>\n  <p>{}</p>\n</div>",
        encode_text(title),
        encode_text(message)
    )
}
