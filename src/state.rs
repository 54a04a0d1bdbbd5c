//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        account_service::AccountService,
        bank_link_service::BankLinkService,
        credential_service::{CredentialService, PlaintextSealer},
        transfer_service::TransferService,
    },
    store::SharedStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<Config>,
    pub accounts: AccountService,
    pub credentials: CredentialService,
    pub transfers: TransferService,
    pub bank_links: BankLinkService,
}

impl AppState {
    /// Wire every service to the same store handle.
    pub fn new(store: SharedStore, config: Config) -> Self {
        let credentials = CredentialService::new(
            store.clone(),
            Arc::new(PlaintextSealer),
            config.mpin_require_existing_account,
        );

        Self {
            accounts: AccountService::new(store.clone()),
            credentials,
            transfers: TransferService::new(store.clone()),
            bank_links: BankLinkService::new(store.clone()),
            config: Arc::new(config),
            store,
        }
    }
}
