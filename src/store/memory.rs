//! In-process record store.
//!
//! Keeps each collection in insertion order behind a single `RwLock`. It
//! mirrors the Postgres store's observable behavior (unique ids and
//! identities, joined transfer listing, newest-first ordering) and is used by
//! the test suite and by `STORE_BACKEND=memory`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{CollectionCounts, RecordStore, StoreError};
use crate::models::{
    account::{Account, AccountPatch},
    bank_link::{BankLink, BankLinkPatch},
    transfer::{Transfer, TransferKind, TransferPatch, TransferView},
};

#[derive(Debug, Default)]
struct Collections {
    accounts: Vec<Account>,
    transfers: Vec<Transfer>,
    bank_links: Vec<BankLink>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn counts(&self) -> Result<CollectionCounts, StoreError> {
        let inner = self.inner.read().await;
        Ok(CollectionCounts {
            users: inner.accounts.len() as i64,
            transactions: inner.transfers.len() as i64,
            bank_links: inner.bank_links.len() as i64,
        })
    }

    async fn close(&self) {}

    async fn find_account_by_identity(
        &self,
        identity: &str,
    ) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.identity == identity)
            .cloned())
    }

    async fn list_accounts(&self, search: Option<&str>) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        let accounts = match search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                inner
                    .accounts
                    .iter()
                    .filter(|a| a.matches_search(&needle))
                    .cloned()
                    .collect()
            }
            None => inner.accounts.clone(),
        };
        Ok(accounts)
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.accounts.iter().any(|a| a.id == account.id) {
            return Err(StoreError::Duplicate(format!("account {}", account.id)));
        }
        if inner.accounts.iter().any(|a| a.identity == account.identity) {
            return Err(StoreError::Duplicate(format!(
                "account with identity {}",
                account.identity
            )));
        }
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn patch_account(
        &self,
        id: &str,
        patch: &AccountPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.accounts.iter_mut().find(|a| a.id == id).map(|a| {
            a.apply(patch, now);
            a.clone()
        }))
    }

    async fn set_account_mpin(
        &self,
        identity: &str,
        sealed: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .accounts
            .iter_mut()
            .find(|a| a.identity == identity)
            .map(|a| {
                a.mpin = Some(sealed.to_string());
                a.updated_at = now;
                a.clone()
            }))
    }

    async fn delete_account(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.accounts.len();
        inner.accounts.retain(|a| a.id != id);
        Ok(inner.accounts.len() != before)
    }

    async fn insert_transfer(&self, transfer: Transfer) -> Result<Transfer, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.transfers.iter().any(|t| t.id == transfer.id) {
            return Err(StoreError::Duplicate(format!("transfer {}", transfer.id)));
        }
        inner.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn list_transfers(
        &self,
        kind: Option<TransferKind>,
    ) -> Result<Vec<TransferView>, StoreError> {
        let inner = self.inner.read().await;
        let name_of = |identity: &str| {
            inner
                .accounts
                .iter()
                .find(|a| a.identity == identity)
                .map(|a| a.full_name.clone())
        };

        let mut views: Vec<TransferView> = inner
            .transfers
            .iter()
            .filter(|t| kind.is_none() || t.kind == kind)
            .map(|t| TransferView {
                sender_name: name_of(&t.sender_id),
                receiver_name: name_of(&t.receiver_id),
                transfer: t.clone(),
            })
            .collect();

        views.sort_by(|a, b| {
            b.transfer
                .timestamp
                .cmp(&a.transfer.timestamp)
                .then_with(|| a.transfer.id.cmp(&b.transfer.id))
        });
        Ok(views)
    }

    async fn patch_transfer(
        &self,
        id: &str,
        patch: &TransferPatch,
    ) -> Result<Option<Transfer>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.transfers.iter_mut().find(|t| t.id == id).map(|t| {
            t.apply(patch);
            t.clone()
        }))
    }

    async fn insert_bank_link(&self, link: BankLink) -> Result<BankLink, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.bank_links.iter().any(|l| l.id == link.id) {
            return Err(StoreError::Duplicate(format!("bank link {}", link.id)));
        }
        inner.bank_links.push(link.clone());
        Ok(link)
    }

    async fn list_bank_links(&self) -> Result<Vec<BankLink>, StoreError> {
        Ok(self.inner.read().await.bank_links.clone())
    }

    async fn patch_bank_link(
        &self,
        id: &str,
        patch: &BankLinkPatch,
    ) -> Result<Option<BankLink>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.bank_links.iter_mut().find(|l| l.id == id).map(|l| {
            l.apply(patch);
            l.clone()
        }))
    }

    async fn delete_bank_link(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.bank_links.len();
        inner.bank_links.retain(|l| l.id != id);
        Ok(inner.bank_links.len() != before)
    }
}
