use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Indian mobile numbers: ten digits, leading 6-9.
fn validate_mobile_number(number: &str) -> Result<(), ValidationError> {
    let valid = number.len() == 10
        && number.chars().all(|c| c.is_ascii_digit())
        && matches!(number.as_bytes()[0], b'6'..=b'9');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("mobile_number").with_message("Invalid mobile number".into()))
    }
}

fn validate_reference(reference: &str) -> Result<(), ValidationError> {
    if reference.trim().is_empty() {
        Err(ValidationError::new("payment_transaction_id")
            .with_message("Payment transaction id is required".into()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct FeeQuoteRequest {
    /// Kept as text so non-numeric input reaches the fee calculator.
    #[validate(length(min = 1, message = "Amount is required"))]
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, message = "Amount is required"))]
    pub amount: String,

    #[validate(custom(function = "validate_mobile_number"))]
    pub mobile_number: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct PaymentStatusRequest {
    #[validate(custom(function = "validate_reference"))]
    pub payment_transaction_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllUserRequest {
    /// Case-insensitive email substring.
    #[serde(default)]
    pub search: String,
}
