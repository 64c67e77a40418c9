use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NotFound(String),
    ValidationFailed(String),
    Conflict(String),
    RecommendationFailed(String),
    PersistenceFailed(String),
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Re-labels a store fault as a recommendation failure, keeping the cause.
    /// Caller-recoverable errors pass through untouched.
    pub fn into_recommendation_failure(self) -> AppError {
        match self {
            AppError::PersistenceFailed(cause) => AppError::RecommendationFailed(cause),
            other => other,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::RecommendationFailed(msg) => write!(f, "Error recommending videos: {}", msg),
            AppError::PersistenceFailed(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::PersistenceFailed(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::PersistenceFailed(format!("Failed to encode document: {}", err))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RecommendationFailed(_) | AppError::PersistenceFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store internals stay in the logs, not in the response body
        let message = match self {
            AppError::RecommendationFailed(_) => "Error recommending videos".to_string(),
            AppError::PersistenceFailed(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": message
        }))
    }
}
