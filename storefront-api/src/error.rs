/// Error handling for the API server
///
/// Handlers return `Result<T, ApiError>`; every variant maps to one HTTP
/// status and a JSON body of the form
/// `{"error": "<code>", "message": "...", "details": [...]}`.
///
/// # Example
///
/// ```
/// use storefront_api::error::ApiResult;
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use storefront_shared::actions::ActionFailed;
use storefront_shared::auth::session::SessionRejection;
use storefront_shared::membership::MembershipError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. a duplicate tier threshold
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// A mutation ran and failed (500); the message is safe to show
    ActionFailed(String),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::ActionFailed(msg) => write!(f, "Action failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            // Already logged and reported to the user by the action runner
            ApiError::ActionFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "action_failed", msg, None)
            }
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                ApiError::ServiceUnavailable("Database is busy, try again later".to_string())
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<SessionRejection> for ApiError {
    fn from(rejection: SessionRejection) -> Self {
        match rejection {
            SessionRejection::Required => ApiError::Unauthorized(rejection.to_string()),
            SessionRejection::Forbidden => ApiError::Forbidden(rejection.to_string()),
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::DuplicateThreshold(_) => ApiError::Conflict(err.to_string()),
            MembershipError::NonPositiveAward(_) => {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "points".to_string(),
                    message: err.to_string(),
                }])
            }
            MembershipError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            MembershipError::Database(db_err) => db_err.into(),
        }
    }
}

impl From<ActionFailed> for ApiError {
    fn from(err: ActionFailed) -> Self {
        ApiError::ActionFailed(err.message)
    }
}

/// Flattens `validator` field errors into response details
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::Conflict("Tier exists".to_string());
        assert_eq!(err.to_string(), "Conflict: Tier exists");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::ValidationError(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::ActionFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_sqlx_error_mapping() {
        assert!(matches!(
            ApiError::from(sqlx::Error::RowNotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolTimedOut),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolClosed),
            ApiError::InternalError(_)
        ));
    }

    #[test]
    fn test_session_rejection_mapping() {
        assert!(matches!(
            ApiError::from(SessionRejection::Required),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(SessionRejection::Forbidden),
            ApiError::Forbidden(_)
        ));
    }

    #[test]
    fn test_membership_error_mapping() {
        assert!(matches!(
            ApiError::from(MembershipError::DuplicateThreshold(100)),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(MembershipError::UserNotFound(uuid::Uuid::new_v4())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(MembershipError::NonPositiveAward(0)),
            ApiError::ValidationError(_)
        ));
    }

    #[test]
    fn test_action_failed_keeps_message() {
        let err = ApiError::from(ActionFailed {
            message: "Something went wrong".to_string(),
        });
        assert!(matches!(err, ApiError::ActionFailed(ref m) if m == "Something went wrong"));
    }

    #[test]
    fn test_validation_errors_flattened() {
        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 3, message = "Too short"))]
            subject: String,
            #[validate(range(min = 1, max = 5))]
            rating: i16,
        }

        let errors = Form {
            subject: "a".to_string(),
            rating: 9,
        }
        .validate()
        .unwrap_err();

        let ApiError::ValidationError(details) = ApiError::from(errors) else {
            panic!("expected validation error");
        };
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "rating");
        assert_eq!(details[0].message, "Validation failed");
        assert_eq!(details[1].field, "subject");
        assert_eq!(details[1].message, "Too short");
    }
}
