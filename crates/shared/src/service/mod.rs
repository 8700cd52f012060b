pub mod fee;
pub mod history;
pub mod reconcile;
pub mod session;
pub mod settlement;

pub use self::fee::{FeeBreakdown, FeeCalculator};
pub use self::history::{TransactionHistory, TransactionView};
pub use self::reconcile::{StatusReconciler, display_status, sort_by_recency};
pub use self::session::{SessionContext, SessionStore};
pub use self::settlement::SettlementCalendar;
