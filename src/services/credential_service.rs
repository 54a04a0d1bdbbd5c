//! MPIN service - setup, verification and change of the transaction PIN.
//!
//! The MPIN lives on the account record. An account is in the `Set` state
//! exactly when a sealed value is stored, so every operation here keeps the
//! status and the value in step by construction.
//!
//! `change` does not re-check the current MPIN; callers are expected to have
//! verified it first. Failed attempts are not counted server-side.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::AppError,
    models::mpin::{MpinCheck, MpinStatus, SetupOutcome},
    store::SharedStore,
};

/// How an MPIN is encoded at rest and compared.
///
/// Every read and write of the stored value goes through this trait, so a
/// hashing scheme can replace [`PlaintextSealer`] without touching callers.
pub trait MpinSealer: Send + Sync {
    /// Encode a raw MPIN for storage.
    fn seal(&self, raw: &str) -> String;

    /// Whether `submitted` corresponds to the stored `sealed` value.
    fn matches(&self, submitted: &str, sealed: &str) -> bool;
}

/// Stores the MPIN as-is and compares by plain equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextSealer;

impl MpinSealer for PlaintextSealer {
    fn seal(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn matches(&self, submitted: &str, sealed: &str) -> bool {
        submitted == sealed
    }
}

#[derive(Clone)]
pub struct CredentialService {
    store: SharedStore,
    sealer: Arc<dyn MpinSealer>,
    require_existing_account: bool,
}

impl CredentialService {
    /// # Arguments
    ///
    /// * `require_existing_account` - when `true`, `setup` on an unknown
    ///   identity fails with `NotFound`; when `false` it succeeds as a no-op
    pub fn new(
        store: SharedStore,
        sealer: Arc<dyn MpinSealer>,
        require_existing_account: bool,
    ) -> Self {
        Self {
            store,
            sealer,
            require_existing_account,
        }
    }

    /// Store `value` as the account's MPIN, overwriting any existing one.
    ///
    /// # Errors
    ///
    /// - `Validation`: identity or value empty
    /// - `NotFound`: no account has this identity and existing accounts are required
    pub async fn setup(&self, identity: &str, value: &str) -> Result<SetupOutcome, AppError> {
        require_fields(identity, value)?;

        if self.require_existing_account
            && self.store.find_account_by_identity(identity).await?.is_none()
        {
            tracing::warn!(identity, "MPIN setup for unknown account");
            return Err(AppError::NotFound(
                "User not found. Please try signing in again.",
            ));
        }

        let sealed = self.sealer.seal(value);
        match self.store.set_account_mpin(identity, &sealed, Utc::now()).await? {
            Some(_) => {
                tracing::info!(identity, "MPIN set");
                Ok(SetupOutcome::Stored)
            }
            None if self.require_existing_account => Err(AppError::NotFound(
                "User not found. Please try signing in again.",
            )),
            None => {
                tracing::warn!(identity, "MPIN setup matched no account; nothing stored");
                Ok(SetupOutcome::Skipped)
            }
        }
    }

    /// Compare `value` with the stored MPIN.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no account has this identity
    /// - `InvalidState`: the account has no MPIN yet
    pub async fn verify(&self, identity: &str, value: &str) -> Result<MpinCheck, AppError> {
        require_fields(identity, value)?;

        let account = self
            .store
            .find_account_by_identity(identity)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        let sealed = account
            .mpin
            .as_deref()
            .ok_or_else(|| AppError::InvalidState("MPIN not set".to_string()))?;

        if self.sealer.matches(value, sealed) {
            tracing::info!(identity, "MPIN verified");
            Ok(MpinCheck::Match)
        } else {
            tracing::warn!(identity, "MPIN mismatch");
            Ok(MpinCheck::Mismatch)
        }
    }

    /// Replace the stored MPIN with `value`.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no account has this identity
    /// - `InvalidState`: the account has no MPIN to change
    pub async fn change(&self, identity: &str, value: &str) -> Result<(), AppError> {
        require_fields(identity, value)?;

        let account = self
            .store
            .find_account_by_identity(identity)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        if account.mpin_status() != MpinStatus::Set {
            return Err(AppError::InvalidState("MPIN not set".to_string()));
        }

        let sealed = self.sealer.seal(value);
        self.store
            .set_account_mpin(identity, &sealed, Utc::now())
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        tracing::info!(identity, "MPIN changed");
        Ok(())
    }

    pub async fn status_of(&self, identity: &str) -> Result<MpinStatus, AppError> {
        let account = self
            .store
            .find_account_by_identity(identity)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        Ok(account.mpin_status())
    }
}

fn require_fields(identity: &str, value: &str) -> Result<(), AppError> {
    if identity.is_empty() || value.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    Ok(())
}
