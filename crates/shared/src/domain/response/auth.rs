use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Plain acknowledgement returned by the backend for OTP, password and
/// profile updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
