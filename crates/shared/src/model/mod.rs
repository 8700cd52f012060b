pub mod transaction;
pub mod user;

pub use self::transaction::{PaymentStatus, Transaction};
pub use self::user::{BankDetails, UserProfile, UserRole, UtrStatus};
