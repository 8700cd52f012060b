use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::FindAllUserRequest,
        response::{ApiResponse, ErrorResponse},
    },
    model::UserProfile,
};

pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;

#[async_trait]
pub trait UserServiceTrait {
    async fn get_users(
        &self,
        token: &str,
        req: &FindAllUserRequest,
    ) -> Result<ApiResponse<Vec<UserProfile>>, ErrorResponse>;
}
