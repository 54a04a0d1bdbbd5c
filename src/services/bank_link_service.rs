//! Bank-link service: admin CRUD over linked bank accounts.

use chrono::Utc;

use crate::{
    error::AppError,
    models::bank_link::{BankLink, BankLinkPatch, CreateBankLinkRequest},
    services::record_id,
    store::SharedStore,
};

#[derive(Clone)]
pub struct BankLinkService {
    store: SharedStore,
}

impl BankLinkService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Record a bank link. The account number is stored as given.
    pub async fn create(&self, request: CreateBankLinkRequest) -> Result<BankLink, AppError> {
        let link = BankLink {
            id: record_id(request.id),
            user_id: request.user_id,
            user_name: request.user_name,
            bank_name: request.bank_name,
            account_number: request.account_number,
            is_verified: request.is_verified,
            created_at: Utc::now(),
        };

        let link = self.store.insert_bank_link(link).await?;
        tracing::info!(id = %link.id, user_id = %link.user_id, bank = %link.bank_name, "Created bank link");

        Ok(link)
    }

    pub async fn list(&self) -> Result<Vec<BankLink>, AppError> {
        Ok(self.store.list_bank_links().await?)
    }

    pub async fn patch(&self, id: &str, patch: BankLinkPatch) -> Result<BankLink, AppError> {
        let link = self
            .store
            .patch_bank_link(id, &patch)
            .await?
            .ok_or(AppError::NotFound("Bank link not found"))?;

        tracing::info!(id = %link.id, "Patched bank link");
        Ok(link)
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete_bank_link(id).await? {
            tracing::warn!(id, "Delete of unknown bank link");
            return Err(AppError::NotFound("Bank link not found"));
        }

        tracing::info!(id, "Deleted bank link");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn request(id: &str, user_id: &str) -> CreateBankLinkRequest {
        CreateBankLinkRequest {
            id: Some(id.to_string()),
            user_id: user_id.to_string(),
            user_name: "Alice Johnson".into(),
            bank_name: "HDFC Bank".into(),
            account_number: "****1234".into(),
            is_verified: false,
        }
    }

    #[tokio::test]
    async fn deleting_unknown_link_is_not_found_and_keeps_others() {
        let links = BankLinkService::new(Arc::new(MemoryStore::new()));
        links.create(request("bl1", "user1")).await.unwrap();
        links.create(request("bl2", "user2")).await.unwrap();

        let err = links.remove("bl-missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        let remaining: Vec<String> = links
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(remaining, ["bl1", "bl2"]);
    }

    #[tokio::test]
    async fn create_generates_id_and_defaults_unverified() {
        let links = BankLinkService::new(Arc::new(MemoryStore::new()));
        let mut req = request("", "user1");
        req.id = None;

        let link = links.create(req).await.unwrap();

        assert!(!link.id.is_empty());
        assert!(!link.is_verified);
    }

    #[tokio::test]
    async fn patch_marks_verified_and_remove_deletes() {
        let links = BankLinkService::new(Arc::new(MemoryStore::new()));
        links.create(request("bl1", "user1")).await.unwrap();

        let patched = links
            .patch(
                "bl1",
                BankLinkPatch {
                    is_verified: Some(true),
                    ..BankLinkPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(patched.is_verified);
        assert_eq!(patched.bank_name, "HDFC Bank");

        links.remove("bl1").await.unwrap();
        assert!(links.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_a_validation_error() {
        let links = BankLinkService::new(Arc::new(MemoryStore::new()));
        links.create(request("bl1", "user1")).await.unwrap();

        let err = links.create(request("bl1", "user2")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
