use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_ifsc(code: &str) -> Result<(), ValidationError> {
    let bytes = code.as_bytes();
    let valid = bytes.len() == 11
        && bytes[..4].iter().all(u8::is_ascii_uppercase)
        && bytes[4] == b'0'
        && bytes[5..].iter().all(u8::is_ascii_alphanumeric);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("ifsc").with_message("Invalid IFSC code".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdatePersonalInfoRequest {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateBankDetailsRequest {
    #[validate(length(min = 2, message = "Account holder is required"))]
    pub account_holder: String,

    #[validate(length(min = 6, max = 18, message = "Account number must be 6 to 18 digits"))]
    pub account_number: String,

    #[validate(custom(function = "validate_ifsc"))]
    pub ifsc_code: String,

    #[validate(length(min = 2, message = "Bank name is required"))]
    pub bank_name: String,
}
