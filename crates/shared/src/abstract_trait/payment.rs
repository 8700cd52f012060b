use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::CreatePaymentRequest,
        response::{ApiResponse, ErrorResponse, payment::PaymentLinkResponse},
    },
    model::{PaymentStatus, Transaction},
    service::FeeBreakdown,
    utils::AppError,
};

pub type DynPaymentStatusLookup = Arc<dyn PaymentStatusLookupTrait + Send + Sync>;
pub type DynPaymentService = Arc<dyn PaymentServiceTrait + Send + Sync>;

/// Remote payment-status endpoint keyed by gateway reference.
#[async_trait]
pub trait PaymentStatusLookupTrait {
    async fn lookup_status(&self, reference: &str) -> Result<PaymentStatus, AppError>;
}

#[async_trait]
pub trait PaymentServiceTrait {
    async fn generate_payment_link(
        &self,
        token: &str,
        user_id: &str,
        breakdown: &FeeBreakdown,
        input: &CreatePaymentRequest,
    ) -> Result<ApiResponse<PaymentLinkResponse>, ErrorResponse>;
    async fn get_user_transactions(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<ApiResponse<Vec<Transaction>>, ErrorResponse>;
}
