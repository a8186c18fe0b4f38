use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use grocerymate_ai::AiError;
use grocerymate_core::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation failed")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Vec<ValidationError>> for AppError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Ai(e) if e.is_malformed_output() => StatusCode::BAD_GATEWAY,
            AppError::Ai(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            AppError::Validation(errors) => json!(errors
                .iter()
                .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                .collect::<Vec<_>>()),
            AppError::Ai(e) => {
                warn!("AI request failed: {}", e);
                json!(format!("Recipe generation service error: {}", e))
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                json!(self.to_string())
            }
            _ => json!(self.to_string()),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        }
        response
    }
}
