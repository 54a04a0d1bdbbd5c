//! Account service - wallet profiles keyed by identity-provider uid.
//!
//! This service handles:
//! - Create-or-update on every login
//! - Lookup by identity
//! - Admin listing, search, create, patch and delete
//!
//! Deleting an account does not touch its transfers or bank links.

use chrono::Utc;

use crate::{
    error::AppError,
    models::account::{Account, AccountPatch, CreateAccountRequest, LoginRequest, LoginUpsert},
    services::record_id,
    store::SharedStore,
};

#[derive(Clone)]
pub struct AccountService {
    store: SharedStore,
}

impl AccountService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create the account on first login, otherwise refresh its profile.
    ///
    /// # Process
    ///
    /// 1. Look the account up by identity
    /// 2. Absent: insert a fresh account (zero balance, MPIN not set)
    /// 3. Present: patch name, email, picture and `updated_at` only
    ///
    /// Empty names and emails are stored as given. The lookup and the write
    /// are separate store calls; two concurrent first logins for the same
    /// identity race, and the loser is rejected by the identity unique key.
    ///
    /// # Errors
    ///
    /// - `Validation`: identity is empty, or a concurrent login won the race
    /// - `Store`: record store failure
    pub async fn upsert_on_login(&self, request: LoginRequest) -> Result<LoginUpsert, AppError> {
        if request.identity.trim().is_empty() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let now = Utc::now();
        let profile_picture = request.profile_picture.unwrap_or_default();

        match self.store.find_account_by_identity(&request.identity).await? {
            Some(existing) => {
                let patch = AccountPatch::profile(request.full_name, request.email, profile_picture);
                let account = self
                    .store
                    .patch_account(&existing.id, &patch, now)
                    .await?
                    .ok_or(AppError::NotFound("User not found"))?;

                tracing::info!(identity = %account.identity, "Updated account on login");
                Ok(LoginUpsert::Updated(account))
            }
            None => {
                let account = Account::new(
                    record_id(None),
                    request.identity,
                    request.full_name,
                    request.email,
                    profile_picture,
                    now,
                );
                let account = self.store.insert_account(account).await?;

                tracing::info!(identity = %account.identity, id = %account.id, "Created account on first login");
                Ok(LoginUpsert::Created(account))
            }
        }
    }

    pub async fn get_by_identity(&self, identity: &str) -> Result<Account, AppError> {
        self.store
            .find_account_by_identity(identity)
            .await?
            .ok_or(AppError::NotFound("User not found"))
    }

    /// List every account, or only those whose name or email contains `query`
    /// (case-insensitive, literal substring). An empty query lists everything;
    /// whitespace is part of the needle.
    pub async fn list_or_search(&self, query: Option<&str>) -> Result<Vec<Account>, AppError> {
        let query = query.filter(|q| !q.is_empty());
        Ok(self.store.list_accounts(query).await?)
    }

    /// Admin create.
    ///
    /// # Errors
    ///
    /// - `Validation`: identity empty, negative balance, or duplicate id/identity
    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, AppError> {
        if request.identity.trim().is_empty() {
            return Err(AppError::Validation("identity is required".to_string()));
        }
        check_balance(request.balance_cents)?;

        let mut account = Account::new(
            record_id(request.id),
            request.identity,
            request.full_name,
            request.email,
            request.profile_picture,
            Utc::now(),
        );
        account.balance_cents = request.balance_cents;
        account.linked_banks = request.linked_banks;
        account.is_profile_complete = request.is_profile_complete;

        let account = self.store.insert_account(account).await?;
        tracing::info!(id = %account.id, identity = %account.identity, "Created account");

        Ok(account)
    }

    /// Merge the supplied fields and refresh `updated_at`.
    pub async fn patch(&self, id: &str, patch: AccountPatch) -> Result<Account, AppError> {
        if let Some(balance_cents) = patch.balance_cents {
            check_balance(balance_cents)?;
        }

        let account = self
            .store
            .patch_account(id, &patch, Utc::now())
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        tracing::info!(id = %account.id, "Patched account");
        Ok(account)
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete_account(id).await? {
            tracing::warn!(id, "Delete of unknown account");
            return Err(AppError::NotFound("User not found"));
        }

        tracing::info!(id, "Deleted account");
        Ok(())
    }
}

fn check_balance(balance_cents: i64) -> Result<(), AppError> {
    if balance_cents < 0 {
        return Err(AppError::Validation(
            "Balance cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RecordStore, memory::MemoryStore};
    use std::sync::Arc;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryStore::new()))
    }

    fn login(identity: &str, name: &str, email: &str) -> LoginRequest {
        LoginRequest {
            identity: identity.to_string(),
            full_name: name.to_string(),
            email: email.to_string(),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn second_login_updates_profile_and_keeps_creation_time() {
        let accounts = service();

        let first = accounts
            .upsert_on_login(login("u1", "Alice", "alice@example.com"))
            .await
            .unwrap();
        assert!(matches!(first, LoginUpsert::Created(_)));

        let second = accounts
            .upsert_on_login(login("u1", "Alice Johnson", "alice@example.com"))
            .await
            .unwrap();
        assert!(matches!(second, LoginUpsert::Updated(_)));

        let all = accounts.list_or_search(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].full_name, "Alice Johnson");
        assert_eq!(all[0].created_at, first.account().created_at);
        assert!(all[0].updated_at >= first.account().updated_at);
    }

    #[tokio::test]
    async fn login_does_not_reset_balance_or_mpin() {
        let store = Arc::new(MemoryStore::new());
        let accounts = AccountService::new(store.clone());
        let created = accounts
            .upsert_on_login(login("u1", "Alice", "a@x.io"))
            .await
            .unwrap()
            .into_account();

        let patch = AccountPatch {
            balance_cents: Some(2500),
            ..AccountPatch::default()
        };
        accounts.patch(&created.id, patch).await.unwrap();
        store.set_account_mpin("u1", "1234", Utc::now()).await.unwrap();

        let again = accounts
            .upsert_on_login(login("u1", "Alice", "a@x.io"))
            .await
            .unwrap()
            .into_account();

        assert_eq!(again.balance_cents, 2500);
        assert_eq!(again.mpin.as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn empty_name_and_email_are_stored_as_given() {
        let accounts = service();

        let account = accounts
            .upsert_on_login(login("u1", "", ""))
            .await
            .unwrap()
            .into_account();

        assert_eq!(account.full_name, "");
        assert_eq!(account.email, "");
    }

    #[tokio::test]
    async fn empty_identity_is_rejected() {
        let err = service()
            .upsert_on_login(login(" ", "A", "a@x.io"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn search_matches_email_substring_case_insensitively() {
        let accounts = service();
        for (uid, name, email) in [
            ("u1", "Alice Johnson", "alice@example.com"),
            ("u2", "Bob Williams", "BOB@Example.COM"),
            ("u3", "Charlie Brown", "charlie@other.org"),
        ] {
            accounts.upsert_on_login(login(uid, name, email)).await.unwrap();
        }

        let found = accounts.list_or_search(Some("eXaMpLe.CoM")).await.unwrap();

        let mut ids: Vec<&str> = found.iter().map(|a| a.identity.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["u1", "u2"]);
    }

    #[tokio::test]
    async fn empty_query_lists_everything() {
        let accounts = service();
        accounts.upsert_on_login(login("u1", "A", "a@x.io")).await.unwrap();
        accounts.upsert_on_login(login("u2", "B", "b@x.io")).await.unwrap();

        assert_eq!(accounts.list_or_search(Some("")).await.unwrap().len(), 2);
        assert_eq!(accounts.list_or_search(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn whitespace_query_is_a_literal_needle() {
        let accounts = service();
        accounts
            .upsert_on_login(login("u1", "Alice Johnson", "alice@x.io"))
            .await
            .unwrap();
        accounts.upsert_on_login(login("u2", "Bob", "bob@x.io")).await.unwrap();

        let spaced = accounts.list_or_search(Some(" ")).await.unwrap();
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].identity, "u1");

        let padded = accounts.list_or_search(Some(" bob")).await.unwrap();
        assert!(padded.is_empty());
    }

    #[tokio::test]
    async fn get_unknown_identity_is_not_found() {
        let err = service().get_by_identity("nobody").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn patch_and_remove_report_missing_records() {
        let accounts = service();

        let patch_err = accounts
            .patch("missing", AccountPatch::default())
            .await
            .unwrap_err();
        let remove_err = accounts.remove("missing").await.unwrap_err();

        assert!(matches!(patch_err, AppError::NotFound(_)));
        assert!(matches!(remove_err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_create_applies_defaults_and_rejects_negative_balance() {
        let accounts = service();

        let created = accounts
            .create(CreateAccountRequest {
                id: Some("user1".into()),
                identity: "uid-1".into(),
                full_name: "Alice".into(),
                email: String::new(),
                profile_picture: String::new(),
                balance_cents: 150050,
                linked_banks: vec![],
                is_profile_complete: false,
            })
            .await
            .unwrap();
        assert_eq!(created.id, "user1");
        assert_eq!(created.mpin, None);
        assert_eq!(created.balance_cents, 150050);

        let err = accounts
            .patch(
                "user1",
                AccountPatch {
                    balance_cents: Some(-1),
                    ..AccountPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
