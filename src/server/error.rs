use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde_json::json;

use crate::error::RecipeError;

/// Error returned by route handlers.
///
/// Always renders as `{ "error": <message> }` with a 500 status, whether the
/// body could not be read or generation itself failed.
#[derive(Debug)]
pub enum ApiError {
    /// The request body was not a readable JSON recipe request
    InvalidBody(JsonRejection),
    Recipe(RecipeError),
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        ApiError::Recipe(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidBody(rejection) => rejection.body_text(),
            ApiError::Recipe(err) => err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidBody(rejection) => {
                warn!("Unreadable recipe request: {}", rejection.body_text())
            }
            ApiError::Recipe(err) if err.is_validation() => {
                warn!("Rejected recipe request: {}", err)
            }
            ApiError::Recipe(err) => {
                error!("Error generating recipe ({}): {}", err.kind(), err)
            }
        }

        let body = Json(json!({
            "error": self.message()
        }));

        (self.status(), body).into_response()
    }
}
