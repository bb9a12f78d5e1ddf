//! Orchestrator integration tests against the in-process store and the
//! scriptable mock rail.

use std::sync::Arc;

use super::*;
use crate::error::WalletError;
use crate::fee::FeePolicy;
use crate::notify::TracingNotifier;
use crate::rail::MockRail;
use crate::reference::Reference;
use crate::wallet::{AccountId, EntryMetadata, EntrySource, WalletStore};

struct Fixture {
    store: Arc<WalletStore>,
    rail: Arc<MockRail>,
    orchestrator: TransferOrchestrator,
    sender: AccountId,
    recipient: AccountId,
    recipient_number: String,
}

fn fixture(sender_balance: u64) -> Fixture {
    let store = Arc::new(WalletStore::new());
    let rail = Arc::new(MockRail::new());
    let fees = FeePolicy {
        external_fee: 50,
        transfer_ceiling: 1_000_000,
        funding_ceiling: 1_000_000,
    };

    let sender = AccountId::from("acct-sender");
    let recipient = AccountId::from("acct-recipient");
    store.create_wallet(&sender).unwrap();
    let recipient_number = store.create_wallet(&recipient).unwrap().account_number;
    if sender_balance > 0 {
        store
            .credit(
                &sender,
                sender_balance,
                &Reference::funding(),
                EntrySource::PaymentGateway,
                EntryMetadata::default(),
            )
            .unwrap();
    }

    let orchestrator = TransferOrchestrator::new(
        store.clone(),
        rail.clone(),
        fees,
        Arc::new(TracingNotifier),
    );
    Fixture {
        store,
        rail,
        orchestrator,
        sender,
        recipient,
        recipient_number,
    }
}

fn internal_req(f: &Fixture, amount: u64) -> InternalTransferRequest {
    InternalTransferRequest {
        sender: f.sender.clone(),
        recipient_account_number: f.recipient_number.clone(),
        amount,
        description: Some("lunch".into()),
    }
}

#[tokio::test]
async fn test_internal_transfer_conservation() {
    let f = fixture(10_000);
    let outcome = f.orchestrator.internal(internal_req(&f, 4_000)).unwrap();

    assert_eq!(outcome.state, TransferState::Completed);
    assert_eq!(outcome.new_balance, 6_000);
    assert_eq!(f.store.balance(&f.sender).unwrap(), 6_000);
    assert_eq!(f.store.balance(&f.recipient).unwrap(), 4_000);

    let credit = outcome.credit_entry.unwrap();
    assert_ne!(outcome.debit_entry.reference, credit.reference);
    assert_eq!(
        outcome.debit_entry.transfer_id,
        credit.transfer_id,
        "both sides share one correlation id"
    );
    assert!(
        outcome
            .debit_entry
            .reference
            .as_str()
            .starts_with("TRANSFER-SENDER-")
    );
    assert!(
        credit
            .reference
            .as_str()
            .starts_with("TRANSFER-RECIPIENT-")
    );
}

#[tokio::test]
async fn test_internal_transfer_insufficient_funds() {
    let f = fixture(5_000);
    let err = f.orchestrator.internal(internal_req(&f, 6_000)).unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
    assert_eq!(f.store.balance(&f.sender).unwrap(), 5_000);
    assert_eq!(f.store.balance(&f.recipient).unwrap(), 0);
}

#[tokio::test]
async fn test_internal_transfer_to_self_rejected() {
    let f = fixture(5_000);
    let own_number = f.store.snapshot(&f.sender).unwrap().account_number;
    let err = f
        .orchestrator
        .internal(InternalTransferRequest {
            sender: f.sender.clone(),
            recipient_account_number: own_number,
            amount: 1_000,
            description: None,
        })
        .unwrap_err();
    assert_eq!(err, WalletError::SelfTransfer);
    assert_eq!(f.store.balance(&f.sender).unwrap(), 5_000);
}

#[tokio::test]
async fn test_internal_transfer_unknown_recipient() {
    let f = fixture(5_000);
    let err = f
        .orchestrator
        .internal(InternalTransferRequest {
            sender: f.sender.clone(),
            recipient_account_number: "0000000000".into(),
            amount: 1_000,
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, WalletError::RecipientUnresolved(_)));
}

#[tokio::test]
async fn test_internal_transfer_above_ceiling() {
    let f = fixture(5_000_000);
    let err = f
        .orchestrator
        .internal(internal_req(&f, 1_000_001))
        .unwrap_err();
    assert!(matches!(err, WalletError::AmountAboveCeiling { .. }));
}

fn external_req(f: &Fixture, amount: u64) -> ExternalTransferRequest {
    ExternalTransferRequest {
        sender: f.sender.clone(),
        account_number: "0123456789".into(),
        bank_code: "044".into(),
        amount,
        description: Some("rent".into()),
    }
}

#[tokio::test]
async fn test_external_transfer_fee_coverage() {
    // 1,000 + fee 50 from 1,040: insufficient
    let f = fixture(1_040);
    f.rail.register_account("0123456789", "ADA OBI", "First Mock Bank");

    let err = f.orchestrator.external(external_req(&f, 1_000)).await.unwrap_err();
    assert!(matches!(
        err,
        WalletError::InsufficientFunds {
            available: 1_040,
            required: 1_050
        }
    ));
    assert_eq!(f.store.balance(&f.sender).unwrap(), 1_040);
    assert_eq!(f.rail.payouts_submitted(), 0, "payout never submitted");
}

#[tokio::test]
async fn test_external_transfer_success() {
    // 1,000 + fee 50 from exactly 1,050
    let f = fixture(1_050);
    f.rail.register_account("0123456789", "ADA OBI", "First Mock Bank");

    let outcome = f.orchestrator.external(external_req(&f, 1_000)).await.unwrap();
    assert_eq!(outcome.state, TransferState::Completed);
    assert_eq!(outcome.new_balance, 0);
    assert_eq!(outcome.fee, Some(50));

    let entry = &outcome.debit_entry;
    assert_eq!(entry.amount, 1_000);
    assert_eq!(entry.fee, Some(50));
    assert!(entry.reference.as_str().starts_with("EXT-TRANSFER-"));
    assert!(entry.gateway_txn_id.is_some());
    assert_eq!(f.rail.payouts_submitted(), 1);
}

#[tokio::test]
async fn test_external_transfer_unresolvable_destination() {
    let f = fixture(10_000);
    // No account registered on the rail
    let err = f.orchestrator.external(external_req(&f, 1_000)).await.unwrap_err();
    assert!(matches!(err, WalletError::RecipientUnresolved(_)));
    assert_eq!(f.store.balance(&f.sender).unwrap(), 10_000);
    assert_eq!(f.rail.payouts_submitted(), 0);
}

#[tokio::test]
async fn test_external_transfer_payout_rejection_leaves_wallet_untouched() {
    let f = fixture(10_000);
    f.rail.register_account("0123456789", "ADA OBI", "First Mock Bank");
    f.rail.reject_payouts();

    let err = f.orchestrator.external(external_req(&f, 1_000)).await.unwrap_err();
    assert!(matches!(err, WalletError::GatewayVerificationFailed(_)));
    assert_eq!(f.store.balance(&f.sender).unwrap(), 10_000);
    assert!(f.store.entries(&f.sender, 10).unwrap().len() == 1); // funding credit only
}

#[tokio::test]
async fn test_external_transfer_timeout_is_indeterminate() {
    let f = fixture(10_000);
    f.rail.register_account("0123456789", "ADA OBI", "First Mock Bank");
    f.rail.timeout_payouts();

    let err = f.orchestrator.external(external_req(&f, 1_000)).await.unwrap_err();
    assert_eq!(err, WalletError::GatewayTimeout);
    assert!(err.is_retryable());
    assert_eq!(f.store.balance(&f.sender).unwrap(), 10_000);
}
