use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{model::PaymentStatus, service::FeeBreakdown};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentLinkResponse {
    pub payment_link: String,
    pub invoice_id: String,
    pub breakdown: FeeBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatusResponse {
    pub payment_transaction_id: String,
    pub status: PaymentStatus,
}
