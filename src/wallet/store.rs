//! Wallet Store
//!
//! In-process storage layer for wallets and their append-only ledgers.
//! Consistency comes from this layer, not from callers:
//!
//! - The global reference index is the uniqueness constraint. A reference is
//!   reserved with an atomic insert-if-absent while the owning wallet's lock
//!   is held, so the loser of a racing insert gets `DuplicateReference` only
//!   after the winner's entry is visible. The reservation is released if the
//!   mutation fails, and becomes permanent once the entry is appended.
//! - Each wallet sits behind its own mutex. The sufficiency check and the
//!   balance write happen under one lock acquisition, so concurrent debits
//!   against the same wallet serialize and never pass a stale check.
//! - A two-wallet transfer takes both locks in a fixed order (by account id)
//!   and applies debit + credit before releasing either, so no reader ever
//!   observes a half-applied transfer and lock ordering rules out deadlock.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::balance::Balance;
use super::entry::{EntryDirection, EntryMetadata, EntrySource, LedgerEntry};
use super::AccountId;
use crate::error::WalletError;
use crate::money::Kobo;
use crate::reference::Reference;

/// One wallet record: balance plus its ordered ledger
#[derive(Debug)]
struct Wallet {
    account_number: String,
    balance: Balance,
    entries: Vec<LedgerEntry>,
}

/// Read-only view of a wallet's current state
#[derive(Debug, Clone, Serialize)]
pub struct WalletSnapshot {
    pub account_id: AccountId,
    pub account_number: String,
    pub balance: Kobo,
}

/// Releases a reserved reference unless the mutation committed.
struct ReferenceReservation<'a> {
    index: &'a DashMap<String, AccountId>,
    key: String,
    committed: bool,
}

impl<'a> ReferenceReservation<'a> {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ReferenceReservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.index.remove(&self.key);
        }
    }
}

/// Wallet + ledger store with atomic mutation and global reference
/// uniqueness.
pub struct WalletStore {
    wallets: DashMap<AccountId, Arc<Mutex<Wallet>>>,
    by_number: DashMap<String, AccountId>,
    /// Global reference index: the idempotency constraint
    references: DashMap<String, AccountId>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
            by_number: DashMap::new(),
            references: DashMap::new(),
        }
    }

    /// Create a wallet for a newly registered account.
    ///
    /// Idempotent: a second call for the same account returns the existing
    /// wallet unchanged. Wallets are never deleted.
    pub fn create_wallet(&self, account_id: &AccountId) -> Result<WalletSnapshot, WalletError> {
        if let Some(existing) = self.wallets.get(account_id) {
            let wallet = lock_wallet(existing.value())?;
            return Ok(WalletSnapshot {
                account_id: account_id.clone(),
                account_number: wallet.account_number.clone(),
                balance: wallet.balance.kobo(),
            });
        }

        let account_number = self.allocate_account_number(account_id);

        match self.wallets.entry(account_id.clone()) {
            Entry::Occupied(o) => {
                // Lost a racing create for the same account; the number we
                // allocated stays unused and is reclaimed below.
                self.by_number.remove(&account_number);
                let wallet = lock_wallet(o.get())?;
                Ok(WalletSnapshot {
                    account_id: account_id.clone(),
                    account_number: wallet.account_number.clone(),
                    balance: wallet.balance.kobo(),
                })
            }
            Entry::Vacant(v) => {
                v.insert(Arc::new(Mutex::new(Wallet {
                    account_number: account_number.clone(),
                    balance: Balance::default(),
                    entries: Vec::new(),
                })));
                info!(account = %account_id, account_number = %account_number, "wallet created");
                Ok(WalletSnapshot {
                    account_id: account_id.clone(),
                    account_number,
                    balance: 0,
                })
            }
        }
    }

    /// Atomically increment the balance and append a completed credit entry.
    pub fn credit(
        &self,
        account_id: &AccountId,
        amount: Kobo,
        reference: &Reference,
        source: EntrySource,
        meta: EntryMetadata,
    ) -> Result<(Kobo, LedgerEntry), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }

        let handle = self.wallet_handle(account_id)?;
        let mut wallet = lock_wallet(&handle)?;
        let reservation = self.reserve_reference(reference, account_id)?;

        let new_balance = wallet
            .balance
            .credit(amount)
            .map_err(|_| WalletError::Overflow)?;

        let entry = LedgerEntry::completed(
            EntryDirection::Credit,
            amount,
            reference.clone(),
            source,
            meta,
            new_balance,
        );
        wallet.entries.push(entry.clone());
        reservation.commit();

        info!(
            account = %account_id,
            reference = %reference,
            amount,
            balance = new_balance,
            "credit applied"
        );
        Ok((new_balance, entry))
    }

    /// Atomically decrement the balance and append a completed debit entry.
    ///
    /// The total removed is `amount + meta.fee`; the entry records the fee
    /// separately from the principal. The sufficiency check runs under the
    /// same lock as the write.
    pub fn debit(
        &self,
        account_id: &AccountId,
        amount: Kobo,
        reference: &Reference,
        source: EntrySource,
        meta: EntryMetadata,
    ) -> Result<(Kobo, LedgerEntry), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }
        let total = amount
            .checked_add(meta.fee.unwrap_or(0))
            .ok_or(WalletError::Overflow)?;

        let handle = self.wallet_handle(account_id)?;
        let mut wallet = lock_wallet(&handle)?;
        let reservation = self.reserve_reference(reference, account_id)?;

        if !wallet.balance.covers(total) {
            warn!(
                account = %account_id,
                reference = %reference,
                available = wallet.balance.kobo(),
                required = total,
                "debit rejected: insufficient funds"
            );
            return Err(WalletError::InsufficientFunds {
                available: wallet.balance.kobo(),
                required: total,
            });
        }
        let new_balance = wallet
            .balance
            .debit(total)
            .map_err(|_| WalletError::Internal("balance underflow past covers check".into()))?;

        let entry = LedgerEntry::completed(
            EntryDirection::Debit,
            amount,
            reference.clone(),
            source,
            meta,
            new_balance,
        );
        wallet.entries.push(entry.clone());
        reservation.commit();

        info!(
            account = %account_id,
            reference = %reference,
            amount,
            balance = new_balance,
            "debit applied"
        );
        Ok((new_balance, entry))
    }

    /// Two-wallet atomic unit: debit the sender and credit the recipient, or
    /// apply neither. Each side gets its own reference and entry.
    #[allow(clippy::too_many_arguments)]
    pub fn transfer(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        amount: Kobo,
        sender_ref: &Reference,
        recipient_ref: &Reference,
        sender_meta: EntryMetadata,
        recipient_meta: EntryMetadata,
    ) -> Result<(Kobo, LedgerEntry, LedgerEntry), WalletError> {
        if sender == recipient {
            return Err(WalletError::SelfTransfer);
        }
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }

        let sender_handle = self.wallet_handle(sender)?;
        let recipient_handle = self.wallet_handle(recipient)?;

        // Fixed lock order by account id prevents deadlock between
        // concurrent opposing transfers. References are reserved under the
        // locks so a duplicate is only reported once the winner committed.
        let (mut sender_wallet, mut recipient_wallet) = if sender.as_str() < recipient.as_str() {
            let s = lock_wallet(&sender_handle)?;
            let r = lock_wallet(&recipient_handle)?;
            (s, r)
        } else {
            let r = lock_wallet(&recipient_handle)?;
            let s = lock_wallet(&sender_handle)?;
            (s, r)
        };

        let debit_reservation = self.reserve_reference(sender_ref, sender)?;
        let credit_reservation = self.reserve_reference(recipient_ref, recipient)?;

        if !sender_wallet.balance.covers(amount) {
            warn!(
                sender = %sender,
                recipient = %recipient,
                available = sender_wallet.balance.kobo(),
                required = amount,
                "transfer rejected: insufficient funds"
            );
            return Err(WalletError::InsufficientFunds {
                available: sender_wallet.balance.kobo(),
                required: amount,
            });
        }

        // Recipient overflow is checked before the sender debit so a failure
        // leaves both wallets untouched.
        let credited = recipient_wallet
            .balance
            .credit(amount)
            .map_err(|_| WalletError::Overflow)?;
        let debited = sender_wallet
            .balance
            .debit(amount)
            .map_err(|_| WalletError::Internal("debit failed past covers check".into()))?;

        let debit_entry = LedgerEntry::completed(
            EntryDirection::Debit,
            amount,
            sender_ref.clone(),
            EntrySource::PeerTransfer,
            sender_meta,
            debited,
        );
        let credit_entry = LedgerEntry::completed(
            EntryDirection::Credit,
            amount,
            recipient_ref.clone(),
            EntrySource::PeerTransfer,
            recipient_meta,
            credited,
        );
        sender_wallet.entries.push(debit_entry.clone());
        recipient_wallet.entries.push(credit_entry.clone());
        debit_reservation.commit();
        credit_reservation.commit();

        info!(
            sender = %sender,
            recipient = %recipient,
            amount,
            sender_balance = debited,
            "internal transfer applied"
        );
        Ok((debited, debit_entry, credit_entry))
    }

    /// Authoritative (non-cached) balance read
    pub fn balance(&self, account_id: &AccountId) -> Result<Kobo, WalletError> {
        let handle = self.wallet_handle(account_id)?;
        let wallet = lock_wallet(&handle)?;
        Ok(wallet.balance.kobo())
    }

    /// Current wallet state for presentation
    pub fn snapshot(&self, account_id: &AccountId) -> Result<WalletSnapshot, WalletError> {
        let handle = self.wallet_handle(account_id)?;
        let wallet = lock_wallet(&handle)?;
        Ok(WalletSnapshot {
            account_id: account_id.clone(),
            account_number: wallet.account_number.clone(),
            balance: wallet.balance.kobo(),
        })
    }

    /// Ledger entries newest-first, up to `limit`
    pub fn entries(
        &self,
        account_id: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, WalletError> {
        let handle = self.wallet_handle(account_id)?;
        let wallet = lock_wallet(&handle)?;
        Ok(wallet.entries.iter().rev().take(limit).cloned().collect())
    }

    /// Find the entry written under a reference, with its owning account
    pub fn entry_by_reference(
        &self,
        reference: &Reference,
    ) -> Option<(AccountId, LedgerEntry)> {
        let owner = self.references.get(reference.as_str())?.value().clone();
        let handle = self.wallets.get(&owner)?.value().clone();
        let wallet = handle.lock().ok()?;
        let entry = wallet
            .entries
            .iter()
            .find(|e| e.reference == *reference)
            .cloned()?;
        Some((owner, entry))
    }

    /// Resolve a routable account number to its owning account
    pub fn resolve_account_number(&self, account_number: &str) -> Option<AccountId> {
        self.by_number.get(account_number).map(|r| r.value().clone())
    }

    fn wallet_handle(&self, account_id: &AccountId) -> Result<Arc<Mutex<Wallet>>, WalletError> {
        self.wallets
            .get(account_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| WalletError::WalletNotFound(account_id.to_string()))
    }

    /// Atomic insert-if-absent on the reference index. This is the
    /// enforcement point of the idempotency guard: the losing writer of a
    /// race gets `DuplicateReference` here, never a double entry.
    fn reserve_reference<'a>(
        &'a self,
        reference: &Reference,
        owner: &AccountId,
    ) -> Result<ReferenceReservation<'a>, WalletError> {
        match self.references.entry(reference.as_str().to_string()) {
            Entry::Occupied(_) => Err(WalletError::DuplicateReference(reference.to_string())),
            Entry::Vacant(v) => {
                v.insert(owner.clone());
                Ok(ReferenceReservation {
                    index: &self.references,
                    key: reference.as_str().to_string(),
                    committed: false,
                })
            }
        }
    }

    /// Allocate a fresh 10-digit account number and claim it in the index.
    fn allocate_account_number(&self, account_id: &AccountId) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("{}", rng.gen_range(1_000_000_000u64..=9_999_999_999));
            match self.by_number.entry(candidate.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(v) => {
                    v.insert(account_id.clone());
                    return candidate;
                }
            }
        }
    }
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_wallet(handle: &Arc<Mutex<Wallet>>) -> Result<MutexGuard<'_, Wallet>, WalletError> {
    handle
        .lock()
        .map_err(|_| WalletError::StoreUnavailable("wallet lock poisoned".into()))
}
