use crate::entities::BookingStatus;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid package type: {0}")]
    InvalidPackageType(String),

    #[error("No sessions remaining on membership {membership_id}")]
    NoSessionsRemaining { membership_id: i64 },

    #[error("Invalid transition for booking {booking_id}: {from} -> {to}")]
    InvalidTransition {
        booking_id: i64,
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// 与错误相关的实体ID（如有）
    pub fn entity_id(&self) -> Option<i64> {
        match self {
            AppError::NoSessionsRemaining { membership_id } => Some(*membership_id),
            AppError::InvalidTransition { booking_id, .. } => Some(*booking_id),
            _ => None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidPackageType(_) => "INVALID_PACKAGE_TYPE",
            AppError::NoSessionsRemaining { .. } => "NO_SESSIONS_REMAINING",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPackageType(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NoSessionsRemaining { .. }
            | AppError::InvalidTransition { .. }
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            AppError::InternalError(msg) => {
                log::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            AppError::JwtError(err) => {
                log::warn!("JWT error: {err}");
                "Invalid access token".to_string()
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                msg.clone()
            }
            AppError::PermissionDenied(msg) => {
                log::warn!("Permission denied: {msg}");
                self.to_string()
            }
            other => {
                log::warn!("{other}");
                other.to_string()
            }
        };

        let mut error = json!({
            "code": self.code(),
            "message": message,
        });
        if let Some(id) = self.entity_id() {
            error["entity_id"] = json!(id);
        }

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": error
        }))
    }
}
