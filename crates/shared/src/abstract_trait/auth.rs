use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    request::{
        ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
        VerifyOtpRequest,
    },
    response::{ApiResponse, ErrorResponse, auth::MessageResponse},
};

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

/// Backend authentication. Token-returning calls yield the raw bearer token.
#[async_trait]
pub trait AuthServiceTrait {
    async fn register_user(
        &self,
        input: &RegisterRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse>;
    async fn login_user(&self, input: &LoginRequest) -> Result<ApiResponse<String>, ErrorResponse>;
    async fn verify_otp(
        &self,
        input: &VerifyOtpRequest,
    ) -> Result<ApiResponse<String>, ErrorResponse>;
    async fn forgot_password(
        &self,
        input: &ForgotPasswordRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse>;
    async fn reset_password(
        &self,
        input: &ResetPasswordRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse>;
}
