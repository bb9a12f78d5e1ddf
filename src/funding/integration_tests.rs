//! Funding pipeline integration tests: verify/webhook reconciliation against
//! the mock rail.

use std::sync::Arc;

use super::types::{WebhookEvent, WebhookPaymentData};
use super::*;
use crate::error::WalletError;
use crate::fee::FeePolicy;
use crate::identity::StaticTokenIdentity;
use crate::notify::TracingNotifier;
use crate::rail::{MockRail, PaymentRail};
use crate::reference::Reference;
use crate::wallet::{AccountId, EntryMetadata, EntrySource, WalletStore};

struct Fixture {
    store: Arc<WalletStore>,
    rail: Arc<MockRail>,
    service: FundingService,
    account: AccountId,
    account_number: String,
}

fn fixture(initial_balance: u64) -> Fixture {
    let store = Arc::new(WalletStore::new());
    let rail = Arc::new(MockRail::new());
    let identity = Arc::new(StaticTokenIdentity::new());
    let fees = FeePolicy {
        external_fee: 50,
        transfer_ceiling: 1_000_000,
        funding_ceiling: 1_000_000,
    };

    let account = AccountId::from("acct-payer");
    let account_number = store.create_wallet(&account).unwrap().account_number;
    if initial_balance > 0 {
        store
            .credit(
                &account,
                initial_balance,
                &Reference::funding(),
                EntrySource::PaymentGateway,
                EntryMetadata::default(),
            )
            .unwrap();
    }

    let service = FundingService::new(
        store.clone(),
        rail.clone(),
        identity,
        fees,
        Arc::new(TracingNotifier),
    );
    Fixture {
        store,
        rail,
        service,
        account,
        account_number,
    }
}

#[tokio::test]
async fn test_initiate_funding() {
    let f = fixture(0);
    let initiated = f
        .service
        .initiate(&f.account, 5_000, &f.account_number)
        .await
        .unwrap();
    assert!(initiated.reference.starts_with("FUND-"));
    assert!(initiated.payment_url.contains(&initiated.gateway_txn_id));
}

#[tokio::test]
async fn test_initiate_rejects_foreign_account_number() {
    let f = fixture(0);
    let err = f
        .service
        .initiate(&f.account, 5_000, "9999999999")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::AccountNumberUnknown(_)));
}

#[tokio::test]
async fn test_initiate_enforces_ceiling() {
    let f = fixture(0);
    let err = f
        .service
        .initiate(&f.account, 1_000_001, &f.account_number)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::AmountAboveCeiling { .. }));
}

#[tokio::test]
async fn test_verified_funding_credits_once() {
    // Wallet at 10,000; fund +5,000 via FUND-A; repeat verification.
    let f = fixture(10_000);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);

    let first = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, Some(5_000))
        .await
        .unwrap();
    assert_eq!(first.balance, 15_000);
    assert!(!first.already_processed);

    let second = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, Some(5_000))
        .await
        .unwrap();
    assert_eq!(second.balance, 15_000);
    assert!(second.already_processed);

    // Exactly one new entry
    assert_eq!(f.store.entries(&f.account, 10).unwrap().len(), 2);
}

#[tokio::test]
async fn test_amount_mismatch_rejected() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);

    let err = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, Some(9_999))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WalletError::AmountMismatch {
            claimed: 9_999,
            verified: 5_000
        }
    );
    assert_eq!(f.store.balance(&f.account).unwrap(), 0);
}

#[tokio::test]
async fn test_unsettled_payment_not_credited() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.fail_payment("TXN-1", &reference, 5_000);

    let err = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::GatewayVerificationFailed(_)));
    assert_eq!(f.store.balance(&f.account).unwrap(), 0);
}

#[tokio::test]
async fn test_reference_mismatch_rejected() {
    let f = fixture(0);
    f.rail.settle_payment("TXN-1", &Reference::funding(), 5_000);

    // Caller presents a different reference than the rail holds
    let err = f
        .service
        .reconcile(&f.account, "TXN-1", &Reference::funding(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::GatewayVerificationFailed(_)));
}

#[tokio::test]
async fn test_verification_timeout_leaves_wallet_unmutated() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);
    f.rail.timeout_verification();

    let err = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, None)
        .await
        .unwrap_err();
    assert_eq!(err, WalletError::GatewayTimeout);
    assert!(err.is_retryable());
    assert_eq!(f.store.balance(&f.account).unwrap(), 0);
}

#[tokio::test]
async fn test_funding_ceiling_enforced_on_verified_amount() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 2_000_000);

    let err = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::AmountAboveCeiling { .. }));
    assert_eq!(f.store.balance(&f.account).unwrap(), 0);
}

#[tokio::test]
async fn test_credit_goes_only_to_initiating_account() {
    // Knowing a (transaction id, reference) pair is not enough to capture
    // the payment: the reference is bound to the wallet that initiated it.
    let f = fixture(0);
    let initiated = f
        .service
        .initiate(&f.account, 5_000, &f.account_number)
        .await
        .unwrap();

    let intruder = AccountId::from("acct-intruder");
    f.store.create_wallet(&intruder).unwrap();
    let reference = Reference::from_string(initiated.reference.clone());

    let err = f
        .service
        .reconcile(&intruder, &initiated.gateway_txn_id, &reference, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::ForeignReference(_)));
    assert_eq!(f.store.balance(&intruder).unwrap(), 0);

    // The initiating wallet still settles normally
    let settled = f
        .service
        .reconcile(&f.account, &initiated.gateway_txn_id, &reference, None)
        .await
        .unwrap();
    assert_eq!(settled.balance, 5_000);
    assert_eq!(f.store.balance(&f.account).unwrap(), 5_000);
}

#[tokio::test]
async fn test_foreign_settled_reference_is_an_error() {
    // A reference that settled on another wallet must never come back as a
    // success-shaped "already processed" for the caller.
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);
    f.service
        .reconcile(&f.account, "TXN-1", &reference, None)
        .await
        .unwrap();

    let other = AccountId::from("acct-other");
    f.store.create_wallet(&other).unwrap();
    let err = f
        .service
        .reconcile(&other, "TXN-bogus", &reference, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::ForeignReference(_)));
    assert_eq!(f.store.balance(&other).unwrap(), 0);
    assert!(f.store.entries(&other, 10).unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_cannot_redirect_credit() {
    // A forged webhook naming a different beneficiary account number is
    // absorbed without crediting anyone but the initiator.
    let f = fixture(0);
    let initiated = f
        .service
        .initiate(&f.account, 5_000, &f.account_number)
        .await
        .unwrap();

    let intruder = AccountId::from("acct-intruder");
    let intruder_number = f.store.create_wallet(&intruder).unwrap().account_number;

    f.service
        .handle_webhook(WebhookEvent {
            event: "charge.success".into(),
            data: WebhookPaymentData {
                id: initiated.gateway_txn_id.clone(),
                reference: initiated.reference.clone(),
                amount: 5_000,
                status: "success".into(),
                account_number: intruder_number,
            },
        })
        .await;
    assert_eq!(f.store.balance(&intruder).unwrap(), 0);
    assert_eq!(f.store.balance(&f.account).unwrap(), 0);

    // The honest webhook still lands
    f.service
        .handle_webhook(WebhookEvent {
            event: "charge.success".into(),
            data: WebhookPaymentData {
                id: initiated.gateway_txn_id.clone(),
                reference: initiated.reference,
                amount: 5_000,
                status: "success".into(),
                account_number: f.account_number.clone(),
            },
        })
        .await;
    assert_eq!(f.store.balance(&f.account).unwrap(), 5_000);
}

fn charge_event(f: &Fixture, reference: &Reference, txn_id: &str, amount: u64) -> WebhookEvent {
    WebhookEvent {
        event: "charge.success".into(),
        data: WebhookPaymentData {
            id: txn_id.to_string(),
            reference: reference.to_string(),
            amount,
            status: "success".into(),
            account_number: f.account_number.clone(),
        },
    }
}

#[tokio::test]
async fn test_webhook_settles_funding() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);

    f.service.handle_webhook(charge_event(&f, &reference, "TXN-1", 5_000)).await;
    assert_eq!(f.store.balance(&f.account).unwrap(), 5_000);
}

#[tokio::test]
async fn test_webhook_redelivery_is_noop() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);

    let event = charge_event(&f, &reference, "TXN-1", 5_000);
    f.service.handle_webhook(event.clone()).await;
    f.service.handle_webhook(event.clone()).await;
    f.service.handle_webhook(event).await;

    assert_eq!(f.store.balance(&f.account).unwrap(), 5_000);
    assert_eq!(f.store.entries(&f.account, 10).unwrap().len(), 1);
}

#[tokio::test]
async fn test_webhook_then_client_verify_converge() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);

    // Webhook lands first
    f.service.handle_webhook(charge_event(&f, &reference, "TXN-1", 5_000)).await;

    // Client re-verifies after redirect: same balance, no second entry
    let settled = f
        .service
        .reconcile(&f.account, "TXN-1", &reference, Some(5_000))
        .await
        .unwrap();
    assert_eq!(settled.balance, 5_000);
    assert!(settled.already_processed);
    assert_eq!(f.store.entries(&f.account, 10).unwrap().len(), 1);
}

#[tokio::test]
async fn test_webhook_absorbs_failures() {
    let f = fixture(0);
    let reference = Reference::funding();
    f.rail.settle_payment("TXN-1", &reference, 5_000);

    // Payload claims a different amount: reconciliation fails internally,
    // the webhook call itself must not error or credit.
    f.service.handle_webhook(charge_event(&f, &reference, "TXN-1", 123)).await;
    assert_eq!(f.store.balance(&f.account).unwrap(), 0);

    // Unknown event types and unknown accounts are absorbed too
    f.service
        .handle_webhook(WebhookEvent {
            event: "charge.dispute".into(),
            data: WebhookPaymentData {
                id: "TXN-2".into(),
                reference: "FUND-X".into(),
                amount: 1,
                status: "success".into(),
                account_number: "0000000000".into(),
            },
        })
        .await;
}

#[tokio::test]
async fn test_initiated_payment_end_to_end() {
    let f = fixture(0);
    let initiated = f
        .service
        .initiate(&f.account, 7_500, &f.account_number)
        .await
        .unwrap();

    // Mock rail settles on initiation; verify by the rail's txn id
    let verified = f.rail.verify_payment(&initiated.gateway_txn_id).await.unwrap();
    assert!(verified.succeeded);

    let settled = f
        .service
        .reconcile(
            &f.account,
            &initiated.gateway_txn_id,
            &Reference::from_string(initiated.reference),
            None,
        )
        .await
        .unwrap();
    assert_eq!(settled.balance, 7_500);
}
