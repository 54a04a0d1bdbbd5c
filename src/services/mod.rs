//! Business logic services.
//!
//! Each service owns a handle to the record store, injected at construction.
//! Services never call each other; every operation is one or two store calls.

pub mod account_service;
pub mod bank_link_service;
pub mod credential_service;
pub mod transfer_service;

use uuid::Uuid;

/// Use the caller-supplied record id, or generate one.
pub(crate) fn record_id(supplied: Option<String>) -> String {
    match supplied {
        Some(id) if !id.trim().is_empty() => id,
        _ => Uuid::new_v4().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::record_id;

    #[test]
    fn keeps_supplied_id_and_generates_otherwise() {
        assert_eq!(record_id(Some("tx_1".into())), "tx_1");
        assert_eq!(record_id(Some("  ".into())).len(), 36);
        assert_ne!(record_id(None), record_id(None));
    }
}
