use crate::error::RecipeError;
use crate::model::RecipeRequest;

/// Fewest ingredients a request may name
pub const MIN_INGREDIENTS: usize = 2;

/// Split comma-separated ingredient text into trimmed, non-empty tokens.
pub fn ingredient_tokens(ingredients: &str) -> Vec<&str> {
    ingredients
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Check that the ingredient text names at least [`MIN_INGREDIENTS`] ingredients.
pub fn validate_ingredients(ingredients: &str) -> Result<(), RecipeError> {
    let found = ingredient_tokens(ingredients).len();
    if found < MIN_INGREDIENTS {
        return Err(RecipeError::InsufficientIngredients { found });
    }
    Ok(())
}

/// Validate a request before any prompt is built.
///
/// Only the ingredient count is checked; dietary preference and fitness
/// goal are display strings and pass through untouched.
pub fn validate_request(request: &RecipeRequest) -> Result<(), RecipeError> {
    validate_ingredients(&request.ingredients)
}
