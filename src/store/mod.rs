//! Record store abstraction.
//!
//! The store holds three independent collections (accounts, transfers and
//! bank links) with no referential integrity between them. Services receive an
//! [`SharedStore`] at construction and never reach for a global handle.
//!
//! Two implementations exist:
//! - [`postgres::PgStore`]: sqlx-backed, used in production
//! - [`memory::MemoryStore`]: process-local, used by tests and the `memory` backend

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    account::{Account, AccountPatch},
    bank_link::{BankLink, BankLinkPatch},
    transfer::{Transfer, TransferKind, TransferPatch, TransferView},
};

/// Errors raised by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A unique key (record id or account identity) already exists.
    #[error("{0} already exists")]
    Duplicate(String),
}

/// Number of records in each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionCounts {
    pub users: i64,
    pub transactions: i64,
    pub bank_links: i64,
}

/// Names of the collections, as reported by the diagnostics endpoint.
pub const COLLECTIONS: [&str; 3] = ["accounts", "transfers", "bank_links"];

pub type SharedStore = Arc<dyn RecordStore>;

/// Operations the services need from the backing store.
///
/// Every method is a single collection operation. Lookups that miss return
/// `Ok(None)` / `Ok(false)`; `Err` is reserved for store failures and unique
/// key violations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn counts(&self) -> Result<CollectionCounts, StoreError>;

    /// Release the underlying connections.
    async fn close(&self);

    async fn find_account_by_identity(&self, identity: &str)
    -> Result<Option<Account>, StoreError>;

    /// List accounts, optionally keeping only those whose name or email
    /// contains `search` case-insensitively.
    async fn list_accounts(&self, search: Option<&str>) -> Result<Vec<Account>, StoreError>;

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError>;

    async fn patch_account(
        &self,
        id: &str,
        patch: &AccountPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError>;

    /// Store a sealed MPIN on the account with the given identity.
    async fn set_account_mpin(
        &self,
        identity: &str,
        sealed: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError>;

    async fn delete_account(&self, id: &str) -> Result<bool, StoreError>;

    async fn insert_transfer(&self, transfer: Transfer) -> Result<Transfer, StoreError>;

    /// Transfers joined with party names, newest first.
    async fn list_transfers(
        &self,
        kind: Option<TransferKind>,
    ) -> Result<Vec<TransferView>, StoreError>;

    async fn patch_transfer(
        &self,
        id: &str,
        patch: &TransferPatch,
    ) -> Result<Option<Transfer>, StoreError>;

    async fn insert_bank_link(&self, link: BankLink) -> Result<BankLink, StoreError>;

    async fn list_bank_links(&self) -> Result<Vec<BankLink>, StoreError>;

    async fn patch_bank_link(
        &self,
        id: &str,
        patch: &BankLinkPatch,
    ) -> Result<Option<BankLink>, StoreError>;

    async fn delete_bank_link(&self, id: &str) -> Result<bool, StoreError>;
}
