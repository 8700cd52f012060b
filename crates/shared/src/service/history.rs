use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    reconcile::{StatusReconciler, display_status, sort_by_recency},
    settlement::SettlementCalendar,
};
use crate::model::{PaymentStatus, Transaction};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Live gateway status; `pending` when no gateway reference exists yet.
    pub display_status: PaymentStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub settlement_date: Option<NaiveDate>,
    pub link_expired: bool,
}

/// Builds the display list shown on the dashboard and the admin user view.
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    reconciler: StatusReconciler,
    calendar: SettlementCalendar,
    link_ttl: chrono::Duration,
}

impl TransactionHistory {
    pub fn new(
        reconciler: StatusReconciler,
        calendar: SettlementCalendar,
        link_ttl: chrono::Duration,
    ) -> Self {
        Self {
            reconciler,
            calendar,
            link_ttl,
        }
    }

    pub fn calendar(&self) -> &SettlementCalendar {
        &self.calendar
    }

    pub async fn build(&self, transactions: Vec<Transaction>) -> Vec<TransactionView> {
        self.build_at(transactions, Utc::now()).await
    }

    pub async fn build_at(
        &self,
        mut transactions: Vec<Transaction>,
        now: DateTime<Utc>,
    ) -> Vec<TransactionView> {
        let statuses = self.reconciler.reconcile(&transactions).await;
        sort_by_recency(&mut transactions);

        transactions
            .into_iter()
            .map(|transaction| {
                let created_at = transaction.created_at_utc();
                let display_status = display_status(&transaction, &statuses);

                TransactionView {
                    settlement_date: created_at.and_then(|c| self.calendar.settlement_date(c)),
                    link_expired: created_at.is_none_or(|c| now - c > self.link_ttl),
                    display_status,
                    transaction,
                }
            })
            .collect()
    }
}
