use thiserror::Error;
use crate::domain::error::EncodeFailure; // ドメインエラーをラップするため
use crate::infrastructure::error::InfrastructureError; // InfrastructureError をラップするため

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Unsupported file: {file_name}")]
    UnsupportedFile { file_name: String },

    #[error("None of the uploaded files could be processed (skipped: {})", .skipped.join(", "))]
    NoValidFiles { skipped: Vec<String> },

    #[error("Form field `{field}` must be an integer, got {value:?}")]
    InvalidFormField { field: String, value: String },

    #[error("{0}")]
    EncodeFailure(#[from] EncodeFailure),

    #[error("Infrastructure error occurred: {0}")]
    InfrastructureError(#[from] InfrastructureError),
}

// IntoResponse implementation for ApplicationError
use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::error;

impl ApplicationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::NoFileSelected
            | ApplicationError::UnsupportedFile { .. }
            | ApplicationError::NoValidFiles { .. }
            | ApplicationError::InvalidFormField { .. } => StatusCode::BAD_REQUEST,
            ApplicationError::EncodeFailure(failure) => match failure {
                EncodeFailure::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
                EncodeFailure::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EncodeFailure::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApplicationError::InfrastructureError(InfrastructureError::MultipartError(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApplicationError::InfrastructureError(InfrastructureError::PayloadTooLarge(_)) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApplicationError::InfrastructureError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApplicationError::NoFileSelected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApplicationError::from(EncodeFailure::invalid("minQuality", "too big")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApplicationError::from(EncodeFailure::Decode("bad".to_string())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApplicationError::from(EncodeFailure::Encode("bad".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApplicationError::from(InfrastructureError::MultipartError("eof".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApplicationError::from(InfrastructureError::PayloadTooLarge("limit".to_string())).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_invalid_parameter_message_names_the_field() {
        let err = ApplicationError::from(EncodeFailure::invalid("minQuality", "60 must not exceed startQuality (40)"));
        assert_eq!(
            err.to_string(),
            "Invalid parameter `minQuality`: 60 must not exceed startQuality (40)"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_valid_files_lists_skipped_names() {
        let err = ApplicationError::NoValidFiles {
            skipped: vec!["notes.txt".to_string(), "broken.png".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "None of the uploaded files could be processed (skipped: notes.txt, broken.png)"
        );
    }
}
