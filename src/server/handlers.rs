use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use log::info;
use serde::Serialize;

use crate::generate_recipe;
use crate::model::RecipeRequest;
use crate::server::error::ApiError;
use crate::server::AppState;

/// Message returned by the root route
pub const STATUS_MESSAGE: &str = "Recipe Generator API is running";

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe: String,
}

/// GET /
pub async fn handle_status() -> &'static str {
    STATUS_MESSAGE
}

/// POST /api/generate-recipe
pub async fn handle_generate_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let Json(request) = payload?;
    info!(
        "Generating recipe (dietary preference: {:?}, fitness goal: {:?}, options: {:?})",
        request.dietary_preference, request.fitness_goal, request.options
    );
    let recipe = generate_recipe(&request, state.gateway.as_ref()).await?;
    Ok(Json(RecipeResponse { recipe }))
}
