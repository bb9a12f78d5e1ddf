//! Transfer orchestration
//!
//! Internal transfers ride the store's two-wallet atomic unit. External
//! transfers resolve the destination first, submit the payout, and debit the
//! sender only after the rail accepts: a rejection or timeout leaves the
//! wallet untouched. All rail I/O happens BEFORE any local mutation, so an
//! indeterminate rail outcome never strands a half-applied transfer.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::types::{
    ExternalTransferRequest, InternalTransferRequest, TransferOutcome, TransferState,
};
use crate::error::WalletError;
use crate::fee::FeePolicy;
use crate::notify::{self, Notifier, WalletEvent};
use crate::rail::{BankDestination, PaymentRail, ResolvedAccount};
use crate::reference::{Reference, TransferId};
use crate::wallet::{EntryMetadata, EntrySource, WalletStore};

pub struct TransferOrchestrator {
    store: Arc<WalletStore>,
    rail: Arc<dyn PaymentRail>,
    fees: FeePolicy,
    notifier: Arc<dyn Notifier>,
}

impl TransferOrchestrator {
    pub fn new(
        store: Arc<WalletStore>,
        rail: Arc<dyn PaymentRail>,
        fees: FeePolicy,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            rail,
            fees,
            notifier,
        }
    }

    /// Peer-to-peer transfer between two wallets in this system.
    ///
    /// Generates one reference per side (they live in different wallets'
    /// ledgers) and applies debit + credit in a single atomic unit: if
    /// either side cannot be applied, neither is.
    pub fn internal(
        &self,
        req: InternalTransferRequest,
    ) -> Result<TransferOutcome, WalletError> {
        self.fees.check_transfer_amount(req.amount)?;

        let state = TransferState::VerifyingRecipient;
        let recipient = self
            .store
            .resolve_account_number(&req.recipient_account_number)
            .ok_or_else(|| {
                warn!(
                    sender = %req.sender,
                    recipient_number = %req.recipient_account_number,
                    state = %state,
                    "internal transfer: recipient unresolved"
                );
                WalletError::RecipientUnresolved(req.recipient_account_number.clone())
            })?;
        if recipient == req.sender {
            return Err(WalletError::SelfTransfer);
        }

        let transfer_id = TransferId::new();
        let sender_ref = Reference::transfer_sender();
        let recipient_ref = Reference::transfer_recipient();
        let sender_snapshot = self.store.snapshot(&req.sender)?;

        let sender_meta = EntryMetadata {
            counterparty: Some(req.recipient_account_number.clone()),
            description: req.description.clone(),
            transfer_id: Some(transfer_id.to_string()),
            ..Default::default()
        };
        let recipient_meta = EntryMetadata {
            counterparty: Some(sender_snapshot.account_number.clone()),
            description: req.description.clone(),
            transfer_id: Some(transfer_id.to_string()),
            ..Default::default()
        };

        let state = TransferState::Debiting;
        debug!(%transfer_id, state = %state, "applying two-wallet atomic unit");
        let (new_balance, debit_entry, credit_entry) = self.store.transfer(
            &req.sender,
            &recipient,
            req.amount,
            &sender_ref,
            &recipient_ref,
            sender_meta,
            recipient_meta,
        )?;
        let state = TransferState::Completed;

        info!(
            %transfer_id,
            sender = %req.sender,
            recipient = %recipient,
            amount = req.amount,
            state = %state,
            "internal transfer completed"
        );
        notify::dispatch(
            self.notifier.clone(),
            WalletEvent::TransferSent {
                account: req.sender.clone(),
                amount: req.amount,
                counterparty: req.recipient_account_number.clone(),
                reference: sender_ref.to_string(),
            },
        );
        notify::dispatch(
            self.notifier.clone(),
            WalletEvent::TransferReceived {
                account: recipient,
                amount: req.amount,
                counterparty: sender_snapshot.account_number,
                reference: recipient_ref.to_string(),
            },
        );

        Ok(TransferOutcome {
            transfer_id: transfer_id.to_string(),
            state,
            new_balance,
            debit_entry,
            credit_entry: Some(credit_entry),
            fee: None,
        })
    }

    /// External payout to a bank account outside this system.
    ///
    /// Order matters: resolve destination (fail fast), pre-check coverage of
    /// amount + fee, submit the payout, and only after the rail accepts
    /// apply the sender's debit. Rejection and timeout both leave the wallet
    /// unmutated.
    pub async fn external(
        &self,
        req: ExternalTransferRequest,
    ) -> Result<TransferOutcome, WalletError> {
        self.fees.check_transfer_amount(req.amount)?;
        let total = self.fees.external_total(req.amount)?;
        let transfer_id = TransferId::new();

        let state = TransferState::VerifyingRecipient;
        let resolved: ResolvedAccount = self
            .rail
            .resolve_account(&req.account_number, &req.bank_code)
            .await
            .map_err(WalletError::from)?;
        info!(
            %transfer_id,
            account_number = %req.account_number,
            account_name = %resolved.account_name,
            state = %state,
            "payout destination resolved"
        );

        // Pre-check before bothering the rail; the atomic debit below is
        // the authoritative enforcement.
        let available = self.store.balance(&req.sender)?;
        if available < total {
            return Err(WalletError::InsufficientFunds {
                available,
                required: total,
            });
        }

        let reference = Reference::external_transfer();
        let destination = BankDestination {
            account_number: req.account_number.clone(),
            bank_code: req.bank_code.clone(),
            account_name: resolved.account_name.clone(),
        };

        let state = TransferState::Debiting;
        let receipt = self
            .rail
            .submit_payout(&destination, req.amount, &reference)
            .await
            .map_err(WalletError::from)?;

        let meta = EntryMetadata {
            counterparty: Some(format!("{}/{}", req.bank_code, req.account_number)),
            description: req.description.clone(),
            gateway_txn_id: Some(receipt.payout_id.clone()),
            fee: Some(self.fees.external_fee),
            transfer_id: Some(transfer_id.to_string()),
        };
        let (new_balance, debit_entry) = self
            .store
            .debit(
                &req.sender,
                req.amount,
                &reference,
                EntrySource::ExternalPayout,
                meta,
            )
            .inspect_err(|e| {
                // The rail accepted but the local debit failed: funds are
                // committed externally with no matching ledger entry. Needs
                // operator reconciliation against payout_id.
                error!(
                    %transfer_id,
                    %reference,
                    payout_id = %receipt.payout_id,
                    state = %state,
                    error = %e,
                    "payout accepted but debit failed; manual reconciliation required"
                );
            })?;

        info!(
            %transfer_id,
            %reference,
            sender = %req.sender,
            amount = req.amount,
            fee = self.fees.external_fee,
            balance = new_balance,
            "external transfer completed"
        );
        notify::dispatch(
            self.notifier.clone(),
            WalletEvent::PayoutSubmitted {
                account: req.sender.clone(),
                amount: req.amount,
                fee: self.fees.external_fee,
                reference: reference.to_string(),
            },
        );

        Ok(TransferOutcome {
            transfer_id: transfer_id.to_string(),
            state: TransferState::Completed,
            new_balance,
            debit_entry,
            credit_entry: None,
            fee: Some(self.fees.external_fee),
        })
    }
}
