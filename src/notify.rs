//! Outbound notification seam
//!
//! Delivery is an external collaborator: fire-and-forget, dispatched AFTER
//! the mutation commits and never inside it. A failed notification has no
//! ledger-affecting return value and rolls nothing back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::money::Kobo;
use crate::wallet::AccountId;

/// Events worth telling the account holder about
#[derive(Debug, Clone)]
pub enum WalletEvent {
    Funded {
        account: AccountId,
        amount: Kobo,
        reference: String,
    },
    TransferSent {
        account: AccountId,
        amount: Kobo,
        counterparty: String,
        reference: String,
    },
    TransferReceived {
        account: AccountId,
        amount: Kobo,
        counterparty: String,
        reference: String,
    },
    PayoutSubmitted {
        account: AccountId,
        amount: Kobo,
        fee: Kobo,
        reference: String,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: WalletEvent);
}

/// Logs the event; stands in for the real email/push sender.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: WalletEvent) {
        info!(?event, "notification dispatched");
    }
}

/// Dispatch outside the caller's critical path. Spawned so a slow or failing
/// sender cannot block or fail the mutation that already committed.
pub fn dispatch(notifier: Arc<dyn Notifier>, event: WalletEvent) {
    tokio::spawn(async move {
        notifier.notify(event).await;
    });
}
