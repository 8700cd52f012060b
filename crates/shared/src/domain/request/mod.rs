pub mod auth;
pub mod payment;
pub mod profile;

pub use self::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};

pub use self::payment::{
    CreatePaymentRequest, FeeQuoteRequest, FindAllUserRequest, PaymentStatusRequest,
};

pub use self::profile::{UpdateBankDetailsRequest, UpdatePasswordRequest, UpdatePersonalInfoRequest};
