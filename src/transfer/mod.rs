//! Transfer Orchestrator
//!
//! Coordinates two-sided (debit + credit) and gateway-mediated
//! (debit + payout) movements as one logical, all-or-nothing operation.

pub mod orchestrator;
pub mod types;

#[cfg(test)]
mod integration_tests;

pub use orchestrator::TransferOrchestrator;
pub use types::{
    ExternalTransferRequest, InternalTransferRequest, TransferOutcome, TransferState,
};
