use crate::utils::AppError;
use core::fmt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod auth;
pub mod payment;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }
}

impl<T: std::fmt::Debug> fmt::Display for ApiResponse<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ApiResponse {{ status: {}, message: {}, data: {:?} }}",
            self.status, self.message, self.data
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    /// HTTP status the gateway answers with.
    #[serde(skip)]
    pub code: u16,
}

impl ErrorResponse {
    pub fn fail(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            message: message.into(),
            code,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = error.status_code();
        let (status, message) = match error {
            AppError::InvalidAmount(ref msg) => ("fail".to_string(), msg.clone()),
            AppError::ValidationError(ref errors) => ("fail".to_string(), errors.to_string()),
            AppError::Unauthorized => (
                "fail".to_string(),
                "You are not logged in, please provide token".to_string(),
            ),
            AppError::Forbidden(ref msg) => ("fail".to_string(), msg.clone()),
            AppError::Upstream { ref message, .. } => ("error".to_string(), message.clone()),
            AppError::Transport(_) => (
                "error".to_string(),
                "Payment service is unreachable".to_string(),
            ),
            AppError::Decode(_) => (
                "error".to_string(),
                "Unexpected response from payment service".to_string(),
            ),
            AppError::InternalError(ref msg) => ("error".to_string(), msg.clone()),
        };
        ErrorResponse {
            status,
            message,
            code,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status: {}, Message: {}", self.status, self.message)
    }
}
