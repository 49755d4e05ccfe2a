use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{ExtractionError, ProvisionError, StoreError};
use serde::Serialize;
use thiserror::Error;

use crate::services::RemoteUserInfoError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable_entity",
                msg.clone(),
            ),
            ApiError::BadGateway(msg) => {
                tracing::warn!("Upstream error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "bad_gateway",
                    "Identity provider request failed".into(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Request bodies that fail to parse or deserialize, including enum tags
/// with no matching variant.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Other(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::UnknownServiceType(service_type) => ApiError::Validation(format!(
                "No provider registered for service type: {}",
                service_type
            )),
            ProvisionError::Issuer(source) => source.into(),
            partial @ ProvisionError::Partial { .. } => {
                let message = partial.to_string();
                match partial {
                    ProvisionError::Partial {
                        source: StoreError::Conflict(_),
                        ..
                    } => ApiError::Conflict(message),
                    _ => ApiError::Internal(message),
                }
            }
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        // The reason stays in the logs; the token is never echoed back.
        tracing::info!(reason = %err, "User info extraction failed");
        ApiError::Unauthorized("Authentication failed".into())
    }
}

impl From<RemoteUserInfoError> for ApiError {
    fn from(err: RemoteUserInfoError) -> Self {
        ApiError::BadGateway(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        let message = match details.len() {
            0 => "Invalid request".to_string(),
            1 => details[0].message.clone(),
            n => format!("{} validation errors", n),
        };

        ApiError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    #[test]
    fn test_api_error_statuses() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Unprocessable("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ApiError::BadGateway("x".into()), StatusCode::BAD_GATEWAY),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::Unprocessable("test".to_string())),
            "Unprocessable: test"
        );
    }

    #[test]
    fn test_from_extraction_error_hides_reason() {
        let error: ApiError = ExtractionError::MalformedToken("bad base64".into()).into();
        match error {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Authentication failed"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }

        let error: ApiError = ExtractionError::MissingClaim("email".into()).into();
        assert!(matches!(error, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_from_partial_provision_conflict() {
        let error: ApiError = ProvisionError::Partial {
            issuer_id: Uuid::new_v4(),
            created_endpoints: 3,
            created_mappings: 2,
            source: StoreError::Conflict("duplicate".into()),
        }
        .into();

        match error {
            ApiError::Conflict(msg) => {
                assert!(msg.contains("3 endpoint(s)"));
                assert!(msg.contains("2 mapping(s)"));
            }
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_from_partial_provision_other() {
        let error: ApiError = ProvisionError::Partial {
            issuer_id: Uuid::new_v4(),
            created_endpoints: 1,
            created_mappings: 0,
            source: StoreError::Other("connection reset".into()),
        }
        .into();
        assert!(matches!(error, ApiError::Internal(_)));
    }

    #[test]
    fn test_from_unknown_service_type() {
        let error: ApiError =
            ProvisionError::UnknownServiceType(domain::models::ServiceType::Custom).into();
        assert!(matches!(error, ApiError::Validation(_)));
    }
}
