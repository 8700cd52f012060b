use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::parse_datetime;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Normalizes a gateway status string. Anything unrecognized counts as failed.
    pub fn from_gateway(value: &str) -> Self {
        match value.trim() {
            "completed" => PaymentStatus::Completed,
            "pending" => PaymentStatus::Pending,
            _ => PaymentStatus::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    #[serde(default)]
    #[schema(value_type = String)]
    pub receive_amount: Decimal,
    #[serde(rename = "smslink", default)]
    pub sms_link: Option<String>,
    /// Bank UTR once the transfer has been made.
    #[serde(rename = "txn_id", default)]
    pub utr: Option<String>,
    #[serde(default)]
    pub payment_transaction_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_transfer_status: PaymentStatus,
}

impl Transaction {
    /// Gateway reference, ignoring blank values the backend sometimes stores.
    pub fn reference(&self) -> Option<&str> {
        self.payment_transaction_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_datetime)
    }
}
