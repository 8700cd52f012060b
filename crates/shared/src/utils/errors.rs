use anyhow::Error as AnyhowError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use serde_json::Error as JsonError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Validation error: {0}")]
    ValidationError(ValidationErrors),

    #[error("You are not logged in, please provide token")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] ReqwestError),

    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Status code the gateway should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidAmount(_) | AppError::ValidationError(_) => 400,
            AppError::Unauthorized => 401,
            AppError::Forbidden(_) => 403,
            AppError::Upstream { status, .. } if (400..500).contains(status) => *status,
            AppError::Upstream { .. } | AppError::Transport(_) | AppError::Decode(_) => 502,
            AppError::InternalError(_) => 500,
        }
    }
}

impl From<AnyhowError> for AppError {
    fn from(err: AnyhowError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::ValidationError(err)
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
