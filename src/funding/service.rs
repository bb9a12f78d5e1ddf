//! Funding service
//!
//! Two entry points reconcile the same underlying payment event: the
//! client's synchronous verify call after redirect, and the gateway's
//! webhook. Both converge on [`FundingService::reconcile`], whose steps are
//! ordered so that a failure at any point leaves the wallet uncredited:
//!
//! 1. wallet lookup
//! 2. reference ownership: a reference initiated for another wallet is
//!    rejected before the rail is consulted
//! 3. existing-reference short-circuit (already settled, same wallet only)
//! 4. authoritative rail verification by gateway transaction id
//! 5. claimed-amount comparison
//! 6. funding ceiling
//! 7. idempotent credit keyed on the payment reference
//!
//! The credit itself is guarded by the store's reference constraint, so the
//! webhook/verify race settles at most one credit no matter the interleaving.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use super::types::{FundingInitiated, FundingSettled, WebhookEvent};
use crate::error::WalletError;
use crate::fee::FeePolicy;
use crate::identity::IdentityProvider;
use crate::money::Kobo;
use crate::notify::{self, Notifier, WalletEvent};
use crate::rail::PaymentRail;
use crate::reference::Reference;
use crate::wallet::{AccountId, EntryMetadata, EntrySource, WalletStore};

pub struct FundingService {
    store: Arc<WalletStore>,
    rail: Arc<dyn PaymentRail>,
    identity: Arc<dyn IdentityProvider>,
    fees: FeePolicy,
    notifier: Arc<dyn Notifier>,
    /// Reference -> initiating account, recorded when a checkout is created.
    /// Reconciliation refuses to credit any other account, so learning a
    /// `(transaction id, reference)` pair is not enough to capture a payment.
    initiations: DashMap<String, AccountId>,
}

impl FundingService {
    pub fn new(
        store: Arc<WalletStore>,
        rail: Arc<dyn PaymentRail>,
        identity: Arc<dyn IdentityProvider>,
        fees: FeePolicy,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            rail,
            identity,
            fees,
            notifier,
            initiations: DashMap::new(),
        }
    }

    /// Start a hosted funding payment for the caller's own wallet.
    ///
    /// The supplied account number must belong to the caller; amounts are
    /// checked against the funding ceiling before the rail is contacted.
    pub async fn initiate(
        &self,
        account: &AccountId,
        amount: Kobo,
        account_number: &str,
    ) -> Result<FundingInitiated, WalletError> {
        self.fees.check_funding_amount(amount)?;

        let snapshot = self.store.snapshot(account)?;
        if snapshot.account_number != account_number {
            warn!(
                %account,
                claimed = account_number,
                "funding initiation rejected: account number mismatch"
            );
            return Err(WalletError::AccountNumberUnknown(account_number.to_string()));
        }

        let reference = Reference::funding();
        let email = self
            .identity
            .email_of(account)
            .await
            .unwrap_or_else(|| format!("{}@wallet.local", account));
        let initiated = self
            .rail
            .initiate_payment(&reference, amount, &email)
            .await
            .map_err(WalletError::from)?;

        self.initiations
            .insert(reference.as_str().to_string(), account.clone());
        info!(
            %account,
            %reference,
            amount,
            gateway_txn_id = %initiated.gateway_txn_id,
            "funding initiated"
        );
        Ok(FundingInitiated {
            payment_url: initiated.payment_url,
            reference: reference.to_string(),
            gateway_txn_id: initiated.gateway_txn_id,
        })
    }

    /// Reconcile a funding payment and credit the wallet at most once.
    ///
    /// `claimed_amount` is whatever the caller asserted (webhook payload or
    /// client request); it is compared against the rail's verified amount
    /// and never trusted on its own. `None` skips the comparison (the
    /// verified amount alone is used).
    pub async fn reconcile(
        &self,
        account: &AccountId,
        gateway_txn_id: &str,
        reference: &Reference,
        claimed_amount: Option<Kobo>,
    ) -> Result<FundingSettled, WalletError> {
        // Step 1: the wallet must exist
        self.store.snapshot(account)?;

        // Step 2: the reference must be bound to this wallet. The binding is
        // written at initiation; presenting another wallet's reference never
        // reaches the rail, let alone the credit.
        if let Some(initiator) = self.initiations.get(reference.as_str())
            && initiator.value() != account
        {
            warn!(
                %account,
                %reference,
                initiator = %initiator.value(),
                "funding rejected: reference initiated by another account"
            );
            return Err(WalletError::ForeignReference(reference.to_string()));
        }

        // Step 3: already settled? Report current state, no re-credit. A
        // reference settled on a different wallet is an error, never a
        // success-shaped "already processed".
        match self.store.entry_by_reference(reference) {
            Some((owner, _)) if owner == *account => {
                return self.settled_state(account, gateway_txn_id, reference);
            }
            Some((owner, _)) => {
                warn!(
                    %account,
                    %reference,
                    owner = %owner,
                    "funding rejected: reference settled on another wallet"
                );
                return Err(WalletError::ForeignReference(reference.to_string()));
            }
            None => {}
        }

        // Step 4: the rail's record is the only trusted source
        let verified = self
            .rail
            .verify_payment(gateway_txn_id)
            .await
            .map_err(WalletError::from)?;
        if !verified.succeeded {
            return Err(WalletError::GatewayVerificationFailed(format!(
                "payment {} not settled on rail",
                gateway_txn_id
            )));
        }
        if verified.reference != reference.as_str() {
            return Err(WalletError::GatewayVerificationFailed(format!(
                "reference mismatch: rail holds {}, caller sent {}",
                verified.reference, reference
            )));
        }

        // Step 5: claimed vs verified amount
        if let Some(claimed) = claimed_amount
            && claimed != verified.amount
        {
            warn!(
                %account,
                %reference,
                claimed,
                verified = verified.amount,
                "funding rejected: amount mismatch"
            );
            return Err(WalletError::AmountMismatch {
                claimed,
                verified: verified.amount,
            });
        }

        // Step 6: funding ceiling on the VERIFIED amount
        self.fees.check_funding_amount(verified.amount)?;

        // Step 7: idempotent credit; a racing settle loses here and is
        // reported as already processed.
        let meta = EntryMetadata {
            gateway_txn_id: Some(gateway_txn_id.to_string()),
            description: Some("wallet funding".into()),
            ..Default::default()
        };
        match self.store.credit(
            account,
            verified.amount,
            reference,
            EntrySource::PaymentGateway,
            meta,
        ) {
            Ok((balance, _entry)) => {
                info!(
                    %account,
                    %reference,
                    amount = verified.amount,
                    balance,
                    "funding settled"
                );
                notify::dispatch(
                    self.notifier.clone(),
                    WalletEvent::Funded {
                        account: account.clone(),
                        amount: verified.amount,
                        reference: reference.to_string(),
                    },
                );
                Ok(FundingSettled {
                    balance,
                    gateway_txn_id: gateway_txn_id.to_string(),
                    reference: reference.to_string(),
                    already_processed: false,
                })
            }
            Err(WalletError::DuplicateReference(_)) => {
                // The other entry point won the race; converge on its result.
                self.settled_state(account, gateway_txn_id, reference)
            }
            Err(e) => Err(e),
        }
    }

    /// Webhook entry point. Runs the same reconciliation, but absorbs every
    /// failure: once the event is durably classified, redelivery must not
    /// produce new side effects or error alerts. The HTTP layer always
    /// acknowledges with 200.
    pub async fn handle_webhook(&self, event: WebhookEvent) {
        if !event.is_charge_success() {
            info!(event = %event.event, "webhook ignored: not a settled charge");
            return;
        }

        let Some(account) = self.store.resolve_account_number(&event.data.account_number)
        else {
            warn!(
                account_number = %event.data.account_number,
                reference = %event.data.reference,
                "webhook dropped: unknown account number"
            );
            return;
        };

        let reference = Reference::from_string(event.data.reference.clone());
        match self
            .reconcile(&account, &event.data.id, &reference, Some(event.data.amount))
            .await
        {
            Ok(settled) if settled.already_processed => {
                info!(%reference, "webhook: already settled, no-op");
            }
            Ok(_) => {
                info!(%reference, "webhook: funding settled");
            }
            Err(e) => {
                // Absorbed: logged for reconciliation follow-up, never
                // surfaced to the gateway as a delivery failure.
                warn!(%reference, error = %e, "webhook reconciliation failed");
            }
        }
    }

    /// Current state for a reference already settled on the caller's wallet
    fn settled_state(
        &self,
        account: &AccountId,
        gateway_txn_id: &str,
        reference: &Reference,
    ) -> Result<FundingSettled, WalletError> {
        match self.store.entry_by_reference(reference) {
            Some((owner, _)) if owner == *account => {
                let balance = self.store.balance(account)?;
                info!(%account, %reference, balance, "reference already settled");
                Ok(FundingSettled {
                    balance,
                    gateway_txn_id: gateway_txn_id.to_string(),
                    reference: reference.to_string(),
                    already_processed: true,
                })
            }
            Some(_) => Err(WalletError::ForeignReference(reference.to_string())),
            None => Err(WalletError::StoreUnavailable(
                "reference reserved but not yet settled".into(),
            )),
        }
    }
}
