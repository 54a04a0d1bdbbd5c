//! Transfer ledger models and API request/response types.
//!
//! This module defines:
//! - `Transfer`: one recorded value movement between two accounts
//! - `TransferView`: a transfer joined with the parties' display names
//! - Request bodies for creating and patching transfers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transfer status.
///
/// Stored in the `transfer_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_status")]
pub enum TransferStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// Direction of a transfer from the point of view of the recording user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_kind")]
pub enum TransferKind {
    Sent,
    Received,
}

impl TransferKind {
    /// Parse the dashboard's `type` filter.
    ///
    /// `"all"` and the empty string mean no filter.
    pub fn parse_filter(raw: &str) -> Result<Option<Self>, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(None),
            "sent" => Ok(Some(TransferKind::Sent)),
            "received" => Ok(Some(TransferKind::Received)),
            other => Err(format!("Unknown transfer type: {other}")),
        }
    }
}

/// Represents a transfer record from the store.
///
/// # Database Table
///
/// Maps to the `transfers` table. Sender and receiver are identity
/// references to accounts; nothing enforces that they resolve.
///
/// Creating a transfer never touches any account balance.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Transfer {
    pub id: String,

    /// Identity of the sending account
    pub sender_id: String,

    /// Identity of the receiving account
    pub receiver_id: String,

    /// Amount in cents
    pub amount_cents: i64,

    pub status: TransferStatus,

    pub kind: Option<TransferKind>,

    /// Server-assigned creation time
    pub timestamp: DateTime<Utc>,
}

impl Transfer {
    pub fn apply(&mut self, patch: &TransferPatch) {
        if let Some(ref sender_id) = patch.sender_id {
            self.sender_id = sender_id.clone();
        }
        if let Some(ref receiver_id) = patch.receiver_id {
            self.receiver_id = receiver_id.clone();
        }
        if let Some(amount_cents) = patch.amount_cents {
            self.amount_cents = amount_cents;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(kind) = patch.kind {
            self.kind = Some(kind);
        }
    }
}

/// A transfer with the parties' names resolved at query time.
///
/// A party whose account no longer exists yields `None` rather than an error.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct TransferView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transfer: Transfer,

    pub sender_name: Option<String>,

    pub receiver_name: Option<String>,
}

/// Request body for `POST /api/admin/transactions`.
///
/// # JSON Example
///
/// ```json
/// {
///   "sender_id": "user1",
///   "receiver_id": "user3",
///   "amount_cents": 10000,
///   "status": "Success",
///   "kind": "Sent"
/// }
/// ```
///
/// No checks are made on the parties, the amount or the sender's balance.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    #[serde(default)]
    pub id: Option<String>,

    pub sender_id: String,

    pub receiver_id: String,

    pub amount_cents: i64,

    /// Defaults to `Pending`
    #[serde(default)]
    pub status: Option<TransferStatus>,

    #[serde(default)]
    pub kind: Option<TransferKind>,
}

/// Field-level patch for a transfer. The timestamp is never patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferPatch {
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub amount_cents: Option<i64>,
    pub status: Option<TransferStatus>,
    pub kind: Option<TransferKind>,
}

/// Query string for `GET /api/admin/transactions`.
#[derive(Debug, Deserialize)]
pub struct TransferListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_filter_accepts_all_and_known_kinds() {
        assert_eq!(TransferKind::parse_filter("all"), Ok(None));
        assert_eq!(TransferKind::parse_filter(""), Ok(None));
        assert_eq!(
            TransferKind::parse_filter("Sent"),
            Ok(Some(TransferKind::Sent))
        );
        assert_eq!(
            TransferKind::parse_filter("received"),
            Ok(Some(TransferKind::Received))
        );
        assert!(TransferKind::parse_filter("refund").is_err());
    }

    #[test]
    fn view_serializes_flat() {
        let view = TransferView {
            transfer: Transfer {
                id: "tx1".into(),
                sender_id: "user1".into(),
                receiver_id: "user3".into(),
                amount_cents: 10000,
                status: TransferStatus::Success,
                kind: Some(TransferKind::Sent),
                timestamp: Utc::now(),
            },
            sender_name: Some("Alice Johnson".into()),
            receiver_name: None,
        };

        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], "tx1");
        assert_eq!(json["status"], "Success");
        assert_eq!(json["sender_name"], "Alice Johnson");
        assert!(json["receiver_name"].is_null());
    }
}
