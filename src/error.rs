use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::validation::{FieldError, ValidationErrors};

/// Every failure a handler can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not Found")]
    NotFound,

    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<&'static str, String>>,
}

impl ApiError {
    pub fn field(field: &'static str, error: FieldError) -> Self {
        ApiError::Validation(ValidationErrors::single(field, error))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                error: "Validation failed".into(),
                errors: Some(errors.messages()),
            },
            ApiError::Internal(e) => {
                error!(error = ?e, "internal error");
                ErrorBody { error: "Internal Server Error".into(), errors: None }
            }
            other => ErrorBody { error: other.to_string(), errors: None },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_envelope() {
        let (status, body) = body_json(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn validation_envelope_lists_fields() {
        let err = ApiError::field("instructions", FieldError::invalid("too short"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["errors"]["instructions"], "too short");
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(!body.to_string().contains("10.0.0.3"));
    }
}
