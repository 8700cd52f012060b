use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::{UpdateBankDetailsRequest, UpdatePasswordRequest, UpdatePersonalInfoRequest},
        response::{ApiResponse, ErrorResponse, auth::MessageResponse},
    },
    model::UserProfile,
};

pub type DynProfileService = Arc<dyn ProfileServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProfileServiceTrait {
    async fn get_profile(&self, token: &str) -> Result<ApiResponse<UserProfile>, ErrorResponse>;
    async fn update_personal_info(
        &self,
        token: &str,
        input: &UpdatePersonalInfoRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse>;
    async fn update_password(
        &self,
        token: &str,
        input: &UpdatePasswordRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse>;
    async fn update_bank_details(
        &self,
        token: &str,
        input: &UpdateBankDetailsRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse>;
}
