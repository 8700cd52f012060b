use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::transaction::Transaction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    #[serde(alias = "User")]
    User,
    #[serde(alias = "Admin")]
    Admin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UtrStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_holder: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub user_role: UserRole,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
    #[serde(default)]
    pub utr_number: Option<String>,
    #[serde(default)]
    pub utr_status: Option<UtrStatus>,
    #[serde(default, rename = "transaction", deserialize_with = "one_or_many")]
    pub transactions: Vec<Transaction>,
}

/// The backend embeds either a single transaction or an array of them.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Transaction>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Transaction>),
        One(Box<Transaction>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(transactions)) => transactions,
        Some(OneOrMany::One(transaction)) => vec![*transaction],
        None => Vec::new(),
    })
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.user_role == UserRole::Admin
    }

    /// Case-insensitive email substring match used by the admin search box.
    pub fn email_matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.email.to_lowercase().contains(&query.to_lowercase())
    }
}
