//! Linked bank account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One external bank account linked to a user.
///
/// # Database Table
///
/// Maps to the `bank_links` table.
///
/// `user_name` is a copy of the owner's display name taken when the link was
/// created. It is a point-in-time snapshot and goes stale when the account is
/// renamed.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct BankLink {
    pub id: String,

    /// Identity of the owning account
    pub user_id: String,

    pub user_name: String,

    pub bank_name: String,

    /// Masked account number, e.g. `****1234`. Not validated.
    pub account_number: String,

    pub is_verified: bool,

    pub created_at: DateTime<Utc>,
}

impl BankLink {
    pub fn apply(&mut self, patch: &BankLinkPatch) {
        if let Some(ref user_id) = patch.user_id {
            self.user_id = user_id.clone();
        }
        if let Some(ref user_name) = patch.user_name {
            self.user_name = user_name.clone();
        }
        if let Some(ref bank_name) = patch.bank_name {
            self.bank_name = bank_name.clone();
        }
        if let Some(ref account_number) = patch.account_number {
            self.account_number = account_number.clone();
        }
        if let Some(is_verified) = patch.is_verified {
            self.is_verified = is_verified;
        }
    }
}

/// Request body for `POST /api/admin/bank-links`.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": "user1",
///   "user_name": "Alice Johnson",
///   "bank_name": "HDFC Bank",
///   "account_number": "****1234"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateBankLinkRequest {
    #[serde(default)]
    pub id: Option<String>,

    pub user_id: String,

    #[serde(default)]
    pub user_name: String,

    pub bank_name: String,

    pub account_number: String,

    #[serde(default)]
    pub is_verified: bool,
}

/// Field-level patch for a bank link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BankLinkPatch {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub is_verified: Option<bool>,
}
