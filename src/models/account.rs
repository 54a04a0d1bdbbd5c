//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: stored wallet profile of one end-user
//! - Request bodies for login upsert, admin create and field patches
//! - `AccountResponse`: what clients see (never includes the MPIN)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::mpin::MpinStatus;

/// Represents an account record from the store.
///
/// # Database Table
///
/// Maps to the `accounts` table. The `mpin_status` column is generated from
/// `mpin`, so it is not part of this struct; use [`Account::mpin_status`].
///
/// # Balance Storage
///
/// Balances are stored as `i64` cents to avoid floating-point rounding.
/// A balance of 1500.50 is stored as 150050.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Account {
    /// Record identifier
    pub id: String,

    /// Identity token issued by the identity provider
    ///
    /// Unique across accounts and never changed after creation. Transfers and
    /// bank links reference accounts through this value.
    pub identity: String,

    pub full_name: String,

    pub email: String,

    pub profile_picture: String,

    /// Wallet balance in cents, never negative
    pub balance_cents: i64,

    /// Sealed MPIN, present iff the MPIN has been set
    pub mpin: Option<String>,

    /// Bank-link identifiers in the order they were linked
    pub linked_banks: Vec<String>,

    pub is_profile_complete: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a freshly onboarded account: zero balance, no MPIN, no banks.
    pub fn new(
        id: String,
        identity: String,
        full_name: String,
        email: String,
        profile_picture: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            identity,
            full_name,
            email,
            profile_picture,
            balance_cents: 0,
            mpin: None,
            linked_banks: Vec::new(),
            is_profile_complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mpin_status(&self) -> MpinStatus {
        MpinStatus::from_stored(self.mpin.as_deref())
    }

    /// Case-insensitive substring match on name or email.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.full_name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    /// Merge the supplied patch fields into this account.
    pub fn apply(&mut self, patch: &AccountPatch, now: DateTime<Utc>) {
        if let Some(ref full_name) = patch.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(ref email) = patch.email {
            self.email = email.clone();
        }
        if let Some(ref profile_picture) = patch.profile_picture {
            self.profile_picture = profile_picture.clone();
        }
        if let Some(balance_cents) = patch.balance_cents {
            self.balance_cents = balance_cents;
        }
        if let Some(ref linked_banks) = patch.linked_banks {
            self.linked_banks = linked_banks.clone();
        }
        if let Some(is_profile_complete) = patch.is_profile_complete {
            self.is_profile_complete = is_profile_complete;
        }
        self.updated_at = now;
    }
}

/// Request body for `POST /api/users`, sent after every identity-provider login.
///
/// # JSON Example
///
/// ```json
/// {
///   "identity": "firebase-uid-123",
///   "full_name": "Alice Johnson",
///   "email": "alice@example.com",
///   "profile_picture": "https://example.com/alice.png"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Request body for `POST /api/admin/users`.
///
/// Only `identity` is required; everything else falls back to the same
/// defaults a fresh login would produce.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub id: Option<String>,

    pub identity: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub profile_picture: String,

    #[serde(default)]
    pub balance_cents: i64,

    #[serde(default)]
    pub linked_banks: Vec<String>,

    #[serde(default)]
    pub is_profile_complete: bool,
}

/// Field-level patch for an account. Absent fields are left untouched.
///
/// The MPIN is deliberately not patchable here; it only changes through the
/// MPIN endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub balance_cents: Option<i64>,
    pub linked_banks: Option<Vec<String>>,
    pub is_profile_complete: Option<bool>,
}

impl AccountPatch {
    /// Patch touching only the fields the identity provider supplies on login.
    pub fn profile(full_name: String, email: String, profile_picture: String) -> Self {
        Self {
            full_name: Some(full_name),
            email: Some(email),
            profile_picture: Some(profile_picture),
            ..Self::default()
        }
    }
}

/// Query string for `GET /api/users`.
#[derive(Debug, Deserialize)]
pub struct IdentityQuery {
    pub identity: Option<String>,
}

/// Query string for `GET /api/admin/users`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "0b6b2f1c-5d0e-4b8e-9d0e-6a1f3c1e2b4a",
///   "identity": "firebase-uid-123",
///   "full_name": "Alice Johnson",
///   "email": "alice@example.com",
///   "profile_picture": "",
///   "balance_cents": 0,
///   "mpin_status": "Not Set",
///   "linked_banks": [],
///   "is_profile_complete": false,
///   "created_at": "2025-12-20T10:00:00Z",
///   "updated_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub identity: String,
    pub full_name: String,
    pub email: String,
    pub profile_picture: String,
    pub balance_cents: i64,
    pub mpin_status: MpinStatus,
    pub linked_banks: Vec<String>,
    pub is_profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Convert a stored Account to the client view.
///
/// This drops the sealed MPIN and exposes only its status.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let mpin_status = account.mpin_status();
        Self {
            id: account.id,
            identity: account.identity,
            full_name: account.full_name,
            email: account.email,
            profile_picture: account.profile_picture,
            balance_cents: account.balance_cents,
            mpin_status,
            linked_banks: account.linked_banks,
            is_profile_complete: account.is_profile_complete,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Outcome of a login upsert.
#[derive(Debug, Clone)]
pub enum LoginUpsert {
    Created(Account),
    Updated(Account),
}

impl LoginUpsert {
    #[cfg(test)]
    pub fn account(&self) -> &Account {
        match self {
            LoginUpsert::Created(account) | LoginUpsert::Updated(account) => account,
        }
    }

    pub fn into_account(self) -> Account {
        match self {
            LoginUpsert::Created(account) | LoginUpsert::Updated(account) => account,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account::new(
            "a1".to_string(),
            "u1".to_string(),
            "Alice Johnson".to_string(),
            "Alice@Example.com".to_string(),
            String::new(),
            Utc::now(),
        )
    }

    #[test]
    fn response_hides_mpin_but_reports_status() {
        let mut account = sample();
        account.mpin = Some("1234".to_string());

        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();

        assert_eq!(json["mpin_status"], "Set");
        assert!(json.get("mpin").is_none());
    }

    #[test]
    fn search_matches_name_or_email_ignoring_case() {
        let account = sample();

        assert!(account.matches_search("example.com"));
        assert!(account.matches_search("johnson"));
        assert!(!account.matches_search("bob"));
    }

    #[test]
    fn profile_patch_leaves_balance_and_mpin_alone() {
        let mut account = sample();
        account.balance_cents = 500;
        account.mpin = Some("1111".to_string());
        let later = account.created_at + chrono::Duration::seconds(5);

        account.apply(
            &AccountPatch::profile("Alice J".into(), "a@x.io".into(), "pic".into()),
            later,
        );

        assert_eq!(account.full_name, "Alice J");
        assert_eq!(account.balance_cents, 500);
        assert_eq!(account.mpin.as_deref(), Some("1111"));
        assert_eq!(account.updated_at, later);
    }
}
