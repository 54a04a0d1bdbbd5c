//! Transfer ledger service.
//!
//! Transfers are recorded, listed and patched. Recording a transfer does not
//! move money: no balance is read or written, and neither party has to exist.

use chrono::Utc;

use crate::{
    error::AppError,
    models::transfer::{
        CreateTransferRequest, Transfer, TransferKind, TransferPatch, TransferView,
    },
    services::record_id,
    store::SharedStore,
};

#[derive(Clone)]
pub struct TransferService {
    store: SharedStore,
}

impl TransferService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Append a transfer. Status defaults to `Pending`, timestamp is now.
    pub async fn create(&self, request: CreateTransferRequest) -> Result<Transfer, AppError> {
        let transfer = Transfer {
            id: record_id(request.id),
            sender_id: request.sender_id,
            receiver_id: request.receiver_id,
            amount_cents: request.amount_cents,
            status: request.status.unwrap_or_default(),
            kind: request.kind,
            timestamp: Utc::now(),
        };

        let transfer = self.store.insert_transfer(transfer).await?;
        tracing::info!(
            id = %transfer.id,
            sender = %transfer.sender_id,
            receiver = %transfer.receiver_id,
            amount_cents = transfer.amount_cents,
            "Recorded transfer"
        );

        Ok(transfer)
    }

    /// All transfers, newest first, with party names resolved now.
    ///
    /// `type_filter` is the dashboard's `type` parameter: `Sent`, `Received`,
    /// `all` or absent.
    pub async fn list(&self, type_filter: Option<&str>) -> Result<Vec<TransferView>, AppError> {
        let kind = match type_filter {
            Some(raw) => TransferKind::parse_filter(raw).map_err(AppError::Validation)?,
            None => None,
        };

        Ok(self.store.list_transfers(kind).await?)
    }

    pub async fn patch(&self, id: &str, patch: TransferPatch) -> Result<Transfer, AppError> {
        let transfer = self
            .store
            .patch_transfer(id, &patch)
            .await?
            .ok_or(AppError::NotFound("Transaction not found"))?;

        tracing::info!(id = %transfer.id, status = ?transfer.status, "Patched transfer");
        Ok(transfer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{account::Account, transfer::TransferStatus},
        store::{RecordStore, memory::MemoryStore},
    };
    use std::sync::Arc;

    fn request(sender: &str, receiver: &str, amount_cents: i64) -> CreateTransferRequest {
        CreateTransferRequest {
            id: None,
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            amount_cents,
            status: None,
            kind: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_pending_and_leaves_balances_alone() {
        let store = Arc::new(MemoryStore::new());
        let mut alice = Account::new(
            "a1".into(),
            "user1".into(),
            "Alice".into(),
            "alice@example.com".into(),
            String::new(),
            Utc::now(),
        );
        alice.balance_cents = 1000;
        store.insert_account(alice).await.unwrap();
        let transfers = TransferService::new(store.clone());

        let transfer = transfers
            .create(request("user1", "nobody", 50_000))
            .await
            .unwrap();

        assert_eq!(transfer.status, TransferStatus::Pending);
        assert!(!transfer.id.is_empty());
        let alice = store
            .find_account_by_identity("user1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alice.balance_cents, 1000);
    }

    #[tokio::test]
    async fn list_filters_by_kind() {
        let transfers = TransferService::new(Arc::new(MemoryStore::new()));
        let mut sent = request("a", "b", 100);
        sent.kind = Some(TransferKind::Sent);
        let mut received = request("b", "a", 200);
        received.kind = Some(TransferKind::Received);
        transfers.create(sent).await.unwrap();
        transfers.create(received).await.unwrap();

        let only_sent = transfers.list(Some("Sent")).await.unwrap();
        let all = transfers.list(Some("all")).await.unwrap();

        assert_eq!(only_sent.len(), 1);
        assert_eq!(only_sent[0].transfer.amount_cents, 100);
        assert_eq!(all.len(), 2);
        assert!(matches!(
            transfers.list(Some("bogus")).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn patch_updates_status_only_and_reports_missing() {
        let transfers = TransferService::new(Arc::new(MemoryStore::new()));
        let created = transfers.create(request("a", "b", 100)).await.unwrap();

        let patched = transfers
            .patch(
                &created.id,
                TransferPatch {
                    status: Some(TransferStatus::Success),
                    ..TransferPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.status, TransferStatus::Success);
        assert_eq!(patched.timestamp, created.timestamp);
        assert_eq!(patched.amount_cents, 100);
        assert!(matches!(
            transfers
                .patch("missing", TransferPatch::default())
                .await
                .unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
