//! Data models representing stored records and API bodies.
//!
//! Each submodule maps to one collection in the record store.

/// Wallet account model
pub mod account;
/// Linked bank account model
pub mod bank_link;
/// MPIN request/response types
pub mod mpin;
/// Transfer ledger model
pub mod transfer;

use serde::Serialize;

/// Response body for delete endpoints.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
}

impl DeleteResponse {
    pub fn one() -> Self {
        Self {
            success: true,
            deleted_count: 1,
        }
    }
}
