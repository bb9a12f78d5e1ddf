//! Payment Verification Pipeline
//!
//! Reconciles an external funding payment against the ledger exactly once,
//! whether it arrives as a synchronous client verification or an
//! asynchronous gateway webhook.

pub mod service;
pub mod types;

#[cfg(test)]
mod integration_tests;

pub use service::FundingService;
pub use types::{FundingInitiated, FundingSettled, WebhookEvent};
