//! Shared gateway state

use std::sync::Arc;

use crate::funding::FundingService;
use crate::identity::IdentityProvider;
use crate::rail::PaymentRail;
use crate::transfer::TransferOrchestrator;
use crate::wallet::WalletStore;

/// Everything the HTTP handlers need, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<WalletStore>,
    pub funding: Arc<FundingService>,
    pub transfers: Arc<TransferOrchestrator>,
    pub rail: Arc<dyn PaymentRail>,
    pub identity: Arc<dyn IdentityProvider>,
}
