//! Kobo Vault - a custodial wallet ledger
//!
//! Every wallet holds a balance in kobo and an append-only ledger of
//! entries; each entry carries a globally unique reference that doubles as
//! the idempotency key. Money enters through a payment gateway (funding),
//! moves between wallets atomically (transfers), and leaves through bank
//! payouts over the same gateway.
//!
//! # Modules
//!
//! - [`money`] - Kobo arithmetic and decimal boundary conversion
//! - [`wallet`] - Wallet store, enforced balance, ledger entries
//! - [`reference`] - Reference and transfer-id generation
//! - [`fee`] - Fee and per-transaction ceiling policy
//! - [`rail`] - Payment-rail seam: HTTP client and scriptable mock
//! - [`funding`] - Inbound payments: initiate, verify, webhook settlement
//! - [`transfer`] - Peer transfers and external payouts
//! - [`identity`] - Bearer-token to account resolution
//! - [`notify`] - Post-commit wallet event notifications
//! - [`gateway`] - HTTP API (axum)

pub mod config;
pub mod error;
pub mod fee;
pub mod funding;
pub mod gateway;
pub mod identity;
pub mod logging;
pub mod money;
pub mod notify;
pub mod rail;
pub mod reference;
pub mod retry;
pub mod transfer;
pub mod wallet;

// Convenient re-exports at crate root
pub use error::WalletError;
pub use fee::FeePolicy;
pub use funding::FundingService;
pub use money::Kobo;
pub use rail::{MockRail, PaymentRail};
pub use reference::{Reference, TransferId};
pub use transfer::TransferOrchestrator;
pub use wallet::{AccountId, Balance, LedgerEntry, WalletStore};
