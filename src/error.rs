use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors raised while loading artifacts or serving a prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Resource not found: {}", .path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("Resource corrupt: {}: {reason}", .path.display())]
    ResourceCorrupt { path: PathBuf, reason: String },

    #[error("Unknown category for {field}: {value:?}")]
    UnknownCategory { field: &'static str, value: String },

    #[error("Pipeline mismatch: {0}")]
    PipelineMismatch(String),
}

impl PredictionError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ResourceCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn mismatch(reason: impl Into<String>) -> Self {
        Self::PipelineMismatch(reason.into())
    }

    /// Stable machine-readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::ResourceNotFound { .. } | Self::ResourceCorrupt { .. } => "resources_unavailable",
            Self::UnknownCategory { .. } => "unknown_category",
            Self::PipelineMismatch(_) => "inference_error",
        }
    }
}

impl ResponseError for PredictionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } | Self::ResourceCorrupt { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::UnknownCategory { .. } => StatusCode::BAD_REQUEST,
            Self::PipelineMismatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Inference details stay in the logs; the caller only sees a generic message.
        let message = match self {
            Self::PipelineMismatch(_) => "Prediction could not be computed for this input".to_string(),
            other => other.to_string(),
        };

        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let unknown = PredictionError::UnknownCategory {
            field: "gender",
            value: "X".to_string(),
        };
        assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown.code(), "unknown_category");

        let mismatch = PredictionError::mismatch("expected 16 features, got 3");
        assert_eq!(mismatch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mismatch.code(), "inference_error");

        let missing = PredictionError::ResourceNotFound {
            path: PathBuf::from("artifacts/my_cardio_model.json"),
        };
        assert_eq!(missing.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_display_names_field_and_value() {
        let err = PredictionError::UnknownCategory {
            field: "cholesterol",
            value: "Tinggi".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown category for cholesterol: \"Tinggi\"");
    }
}
