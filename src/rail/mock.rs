//! Scriptable in-process payment rail
//!
//! Used by tests and by dev builds (`mock-rail` feature). Payments are
//! registered up front; verification reads them back. Payouts, resolution
//! and verification can each be scripted to fail or time out.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{
    Bank, BankDestination, InitiatedPayment, PaymentRail, PayoutReceipt, RailError,
    ResolvedAccount, VerifiedPayment,
};
use crate::money::Kobo;
use crate::reference::Reference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Succeed,
    Reject,
    Timeout,
}

pub struct MockRail {
    /// gateway_txn_id -> authoritative payment record
    payments: DashMap<String, VerifiedPayment>,
    /// account_number -> holder name (resolvable destinations)
    accounts: DashMap<String, ResolvedAccount>,
    payout_script: DashMap<(), Script>,
    verify_script: DashMap<(), Script>,
    txn_seq: AtomicU64,
    payouts_submitted: AtomicUsize,
}

impl MockRail {
    pub fn new() -> Self {
        Self {
            payments: DashMap::new(),
            accounts: DashMap::new(),
            payout_script: DashMap::new(),
            verify_script: DashMap::new(),
            txn_seq: AtomicU64::new(1),
            payouts_submitted: AtomicUsize::new(0),
        }
    }

    /// Register a settled payment the rail will report for `gateway_txn_id`
    pub fn settle_payment(
        &self,
        gateway_txn_id: &str,
        reference: &Reference,
        amount: Kobo,
    ) {
        self.payments.insert(
            gateway_txn_id.to_string(),
            VerifiedPayment {
                gateway_txn_id: gateway_txn_id.to_string(),
                reference: reference.to_string(),
                amount,
                succeeded: true,
                paid_at: Some(chrono::Utc::now()),
            },
        );
    }

    /// Register a payment the rail will report as failed
    pub fn fail_payment(&self, gateway_txn_id: &str, reference: &Reference, amount: Kobo) {
        self.payments.insert(
            gateway_txn_id.to_string(),
            VerifiedPayment {
                gateway_txn_id: gateway_txn_id.to_string(),
                reference: reference.to_string(),
                amount,
                succeeded: false,
                paid_at: None,
            },
        );
    }

    /// Make a bank account resolvable
    pub fn register_account(&self, account_number: &str, account_name: &str, bank_name: &str) {
        self.accounts.insert(
            account_number.to_string(),
            ResolvedAccount {
                account_name: account_name.to_string(),
                bank_name: bank_name.to_string(),
            },
        );
    }

    pub fn reject_payouts(&self) {
        self.payout_script.insert((), Script::Reject);
    }

    pub fn timeout_payouts(&self) {
        self.payout_script.insert((), Script::Timeout);
    }

    pub fn timeout_verification(&self) {
        self.verify_script.insert((), Script::Timeout);
    }

    /// Drop all scripted failures; subsequent calls succeed again
    pub fn clear_scripts(&self) {
        self.payout_script.clear();
        self.verify_script.clear();
    }

    pub fn payouts_submitted(&self) -> usize {
        self.payouts_submitted.load(Ordering::SeqCst)
    }

    fn script_of(map: &DashMap<(), Script>) -> Script {
        map.get(&()).map(|s| *s).unwrap_or(Script::Succeed)
    }
}

impl Default for MockRail {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRail for MockRail {
    async fn initiate_payment(
        &self,
        reference: &Reference,
        amount: Kobo,
        _account_email: &str,
    ) -> Result<InitiatedPayment, RailError> {
        let txn_id = format!("MOCK-TXN-{}", self.txn_seq.fetch_add(1, Ordering::SeqCst));
        // The hosted checkout "settles" immediately in mock mode
        self.settle_payment(&txn_id, reference, amount);
        Ok(InitiatedPayment {
            payment_url: format!("https://rail.example/pay/{}", txn_id),
            gateway_txn_id: txn_id,
        })
    }

    async fn verify_payment(&self, gateway_txn_id: &str) -> Result<VerifiedPayment, RailError> {
        match Self::script_of(&self.verify_script) {
            Script::Timeout => return Err(RailError::Timeout),
            Script::Reject => {
                return Err(RailError::Rejected("verification rejected".into()));
            }
            Script::Succeed => {}
        }
        self.payments
            .get(gateway_txn_id)
            .map(|p| p.value().clone())
            .ok_or_else(|| RailError::Rejected(format!("unknown transaction: {}", gateway_txn_id)))
    }

    async fn submit_payout(
        &self,
        destination: &BankDestination,
        _amount: Kobo,
        _reference: &Reference,
    ) -> Result<PayoutReceipt, RailError> {
        match Self::script_of(&self.payout_script) {
            Script::Timeout => return Err(RailError::Timeout),
            Script::Reject => return Err(RailError::Rejected("payout rejected".into())),
            Script::Succeed => {}
        }
        if !self.accounts.contains_key(&destination.account_number) {
            return Err(RailError::Unresolved(destination.account_number.clone()));
        }
        let n = self.payouts_submitted.fetch_add(1, Ordering::SeqCst);
        Ok(PayoutReceipt {
            payout_id: format!("MOCK-PAYOUT-{}", n + 1),
        })
    }

    async fn resolve_account(
        &self,
        account_number: &str,
        _bank_code: &str,
    ) -> Result<ResolvedAccount, RailError> {
        self.accounts
            .get(account_number)
            .map(|a| a.value().clone())
            .ok_or_else(|| RailError::Unresolved(account_number.to_string()))
    }

    async fn list_banks(&self) -> Result<Vec<Bank>, RailError> {
        Ok(vec![
            Bank {
                name: "First Mock Bank".into(),
                code: "044".into(),
            },
            Bank {
                name: "Mock Trust Bank".into(),
                code: "058".into(),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initiate_then_verify() {
        let rail = MockRail::new();
        let reference = Reference::funding();
        let initiated = rail
            .initiate_payment(&reference, 5_000, "a@example.com")
            .await
            .unwrap();

        let verified = rail.verify_payment(&initiated.gateway_txn_id).await.unwrap();
        assert!(verified.succeeded);
        assert_eq!(verified.amount, 5_000);
        assert_eq!(verified.reference, reference.to_string());
    }

    #[tokio::test]
    async fn test_unknown_transaction_rejected() {
        let rail = MockRail::new();
        assert!(matches!(
            rail.verify_payment("nope").await,
            Err(RailError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_scripted_payout_outcomes() {
        let rail = MockRail::new();
        rail.register_account("0123456789", "ADA OBI", "First Mock Bank");
        let dest = BankDestination {
            account_number: "0123456789".into(),
            bank_code: "044".into(),
            account_name: "ADA OBI".into(),
        };

        assert!(rail
            .submit_payout(&dest, 1_000, &Reference::external_transfer())
            .await
            .is_ok());

        rail.reject_payouts();
        assert!(matches!(
            rail.submit_payout(&dest, 1_000, &Reference::external_transfer())
                .await,
            Err(RailError::Rejected(_))
        ));

        rail.timeout_payouts();
        assert!(matches!(
            rail.submit_payout(&dest, 1_000, &Reference::external_transfer())
                .await,
            Err(RailError::Timeout)
        ));
        assert_eq!(rail.payouts_submitted(), 1);
    }
}
