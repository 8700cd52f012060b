use std::{collections::HashMap, time::Duration};
use tokio::{task::JoinSet, time::Instant};
use tracing::{debug, warn};

use crate::{
    abstract_trait::DynPaymentStatusLookup,
    model::{PaymentStatus, Transaction},
};

/// Resolves the live gateway status of a batch of transactions.
///
/// Lookup failures are never surfaced: a reference whose lookup errors,
/// panics or misses the deadline is reported as `Failed`.
#[derive(Clone)]
pub struct StatusReconciler {
    lookup: DynPaymentStatusLookup,
    timeout: Duration,
}

impl std::fmt::Debug for StatusReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReconciler")
            .field("lookup", &"DynPaymentStatusLookup")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StatusReconciler {
    pub fn new(lookup: DynPaymentStatusLookup, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    pub async fn reconcile(&self, transactions: &[Transaction]) -> HashMap<String, PaymentStatus> {
        let mut statuses: HashMap<String, PaymentStatus> = transactions
            .iter()
            .filter_map(Transaction::reference)
            .map(|reference| (reference.to_string(), PaymentStatus::Failed))
            .collect();

        if statuses.is_empty() {
            return statuses;
        }

        let mut lookups = JoinSet::new();
        for reference in statuses.keys().cloned() {
            let lookup = self.lookup.clone();
            lookups.spawn(async move {
                let result = lookup.lookup_status(&reference).await;
                (reference, result)
            });
        }

        let deadline = Instant::now() + self.timeout;

        loop {
            match tokio::time::timeout_at(deadline, lookups.join_next()).await {
                Ok(Some(Ok((reference, Ok(status))))) => {
                    debug!("Payment {reference} is {status}");
                    statuses.insert(reference, status);
                }
                Ok(Some(Ok((reference, Err(e))))) => {
                    warn!("Status lookup for {reference} failed, showing as failed: {e}");
                }
                Ok(Some(Err(join_err))) => {
                    warn!("Status lookup task aborted: {join_err}");
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Status lookups exceeded {:?}, {} still outstanding",
                        self.timeout,
                        lookups.len()
                    );
                    lookups.abort_all();
                    break;
                }
            }
        }

        statuses
    }
}

/// Status to show for one transaction given a reconciled map.
pub fn display_status(
    transaction: &Transaction,
    statuses: &HashMap<String, PaymentStatus>,
) -> PaymentStatus {
    match transaction.reference() {
        Some(reference) => statuses
            .get(reference)
            .copied()
            .unwrap_or(PaymentStatus::Failed),
        None => PaymentStatus::Pending,
    }
}

/// Most recent first; missing or unparseable timestamps sink to the end.
/// Stable, so equal timestamps keep their input order.
pub fn sort_by_recency(transactions: &mut [Transaction]) {
    transactions.sort_by_cached_key(|tx| std::cmp::Reverse(tx.created_at_utc()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abstract_trait::PaymentStatusLookupTrait, utils::AppError};
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    struct FakeLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PaymentStatusLookupTrait for FakeLookup {
        async fn lookup_status(&self, reference: &str) -> Result<PaymentStatus, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match reference {
                "done" => Ok(PaymentStatus::Completed),
                "waiting" => Ok(PaymentStatus::Pending),
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(PaymentStatus::Completed)
                }
                "boom" => panic!("lookup panicked"),
                _ => Err(AppError::Upstream {
                    status: 500,
                    message: "gateway down".into(),
                }),
            }
        }
    }

    fn tx(reference: Option<&str>, created_at: Option<&str>) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "_id": reference.unwrap_or("none"),
            "amount": "100",
            "paymentTransactionId": reference,
            "createdAt": created_at,
        }))
        .unwrap()
    }

    fn reconciler(timeout: Duration) -> (StatusReconciler, Arc<FakeLookup>) {
        let fake = Arc::new(FakeLookup {
            calls: AtomicUsize::new(0),
        });
        (StatusReconciler::new(fake.clone(), timeout), fake)
    }

    #[tokio::test]
    async fn failures_only_affect_their_own_transaction() {
        let (reconciler, _) = reconciler(Duration::from_secs(5));
        let txs = vec![
            tx(Some("done"), None),
            tx(Some("broken"), None),
            tx(Some("waiting"), None),
        ];

        let statuses = reconciler.reconcile(&txs).await;

        assert_eq!(statuses["done"], PaymentStatus::Completed);
        assert_eq!(statuses["broken"], PaymentStatus::Failed);
        assert_eq!(statuses["waiting"], PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn panicking_lookup_defaults_to_failed() {
        let (reconciler, _) = reconciler(Duration::from_secs(5));
        let txs = vec![tx(Some("boom"), None), tx(Some("done"), None)];

        let statuses = reconciler.reconcile(&txs).await;

        assert_eq!(statuses["boom"], PaymentStatus::Failed);
        assert_eq!(statuses["done"], PaymentStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_marks_outstanding_as_failed() {
        let (reconciler, _) = reconciler(Duration::from_secs(2));
        let txs = vec![tx(Some("slow"), None), tx(Some("done"), None)];

        let statuses = reconciler.reconcile(&txs).await;

        assert_eq!(statuses["slow"], PaymentStatus::Failed);
        assert_eq!(statuses["done"], PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn skips_transactions_without_reference() {
        let (reconciler, fake) = reconciler(Duration::from_secs(5));
        let txs = vec![tx(None, None), tx(Some("done"), None), tx(Some("done"), None)];

        let statuses = reconciler.reconcile(&txs).await;

        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
        assert_eq!(statuses.len(), 1);
        assert_eq!(display_status(&txs[0], &statuses), PaymentStatus::Pending);
        assert_eq!(display_status(&txs[1], &statuses), PaymentStatus::Completed);
    }

    #[test]
    fn sorts_newest_first_with_unparseable_last() {
        let mut txs = vec![
            tx(Some("a"), Some("2025-01-01T10:00:00.000Z")),
            tx(Some("b"), None),
            tx(Some("c"), Some("2025-03-01T10:00:00.000Z")),
            tx(Some("d"), Some("not a date")),
            tx(Some("e"), Some("2025-02-01T10:00:00.000Z")),
        ];

        sort_by_recency(&mut txs);

        let order: Vec<_> = txs.iter().filter_map(Transaction::reference).collect();
        assert_eq!(order, vec!["c", "e", "a", "b", "d"]);
    }

    #[test]
    fn duplicate_timestamps_keep_input_order() {
        let stamp = Some("2025-01-01T10:00:00.000Z");
        let mut txs = vec![tx(Some("x"), stamp), tx(Some("y"), stamp), tx(Some("z"), stamp)];

        sort_by_recency(&mut txs);

        let order: Vec<_> = txs.iter().filter_map(Transaction::reference).collect();
        assert_eq!(order, vec!["x", "y", "z"]);
    }
}
