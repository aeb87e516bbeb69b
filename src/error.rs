use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// User-facing message constants, shared between handlers and tests.
pub mod msg {
    /// Generic authenticity failure. Deliberately does not say which field
    /// mismatched (signature, metadata, or order status).
    pub const VERIFICATION_FAILED: &str = "Payment verification failed";

    pub const TOKEN_NOT_FOUND: &str = "Activation token not found";
    pub const TOKEN_ALREADY_USED: &str = "Activation token already used";
    pub const TOKEN_EXPIRED: &str = "Activation token expired";

    pub const STUDENT_NOT_FOUND: &str = "Student not found";
    pub const TEACHER_NOT_FOUND: &str = "Teacher not found";
    pub const PLAN_NOT_FOUND: &str = "Plan not found";
    pub const TEACHER_PLAN_NOT_FOUND: &str = "Teacher plan not found";

    pub const INVALID_AMOUNT: &str = "Amount must be a positive number";
    pub const INVALID_USER_TYPE: &str =
        "Invalid user_type. Must be student_platform_plan, teacher_platform_plan or student_teacher_plan";
    pub const TEACHER_ID_REQUIRED: &str = "teacher_id_for_plan is required for student_teacher_plan";

    pub const RAZORPAY_NOT_CONFIGURED: &str = "Razorpay is not configured";
    pub const PAYU_NOT_CONFIGURED: &str = "PayU is not configured";
}

/// Extension for `Option` lookups that should 404 when absent.
pub trait OptionExt<T> {
    fn or_not_found(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(msg.to_string()))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone())),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone())),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", Some(msg.clone())),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (StatusCode::BAD_REQUEST, "Invalid JSON", Some(e.to_string()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
