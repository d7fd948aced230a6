//! Error types shared across CineRec crates

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Unified error type for CineRec operations
#[derive(Debug, Error)]
pub enum CineRecError {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    /// Request input failed a validation rule
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Dataset violates an invariant (duplicate ids, out-of-range ratings)
    #[error("Dataset error: {message}")]
    DatasetError { message: String },

    /// A tabular source could not be parsed
    #[error("Failed to parse {path} (row {row:?}): {message}")]
    ParseError {
        path: String,
        row: Option<u64>,
        message: String,
    },

    /// Upstream service call failed
    #[error("Upstream error from {service}: {message}")]
    UpstreamError { service: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CineRecError {
    /// Short machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DatasetError { .. } => "DATASET_ERROR",
            Self::ParseError { .. } => "PARSE_ERROR",
            Self::UpstreamError { .. } => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::DatasetError {
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            service: service.into(),
            message: message.into(),
        }
    }
}

impl ResponseError for CineRecError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            Self::ConfigurationError { .. }
            | Self::DatasetError { .. }
            | Self::ParseError { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.error_code(),
        });
        if let Self::ValidationError {
            field: Some(field), ..
        } = self
        {
            body["field"] = serde_json::Value::String(field.clone());
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CineRecError::validation("bad", "top_n").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CineRecError::NotFound("section".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CineRecError::dataset("dup").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CineRecError::upstream("gemini", "timeout").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_display() {
        let err = CineRecError::ParseError {
            path: "movies.csv".to_string(),
            row: Some(3),
            message: "invalid digit".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse movies.csv (row Some(3)): invalid digit"
        );
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[actix_web::test]
    async fn test_error_response_body() {
        let resp = CineRecError::validation("limit must be a number", "query").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "query");
        assert_eq!(body["error"], "Validation error: limit must be a number");
    }
}
