//! Fee and limit policy
//!
//! External payouts carry a fixed fee; funding and transfers are capped by
//! per-transaction ceilings. All values are kobo and come from config.

use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::money::Kobo;

/// Default fixed fee on external payouts (kobo)
pub const DEFAULT_EXTERNAL_FEE: Kobo = 5_000;

/// Default per-transaction transfer ceiling (kobo)
pub const DEFAULT_TRANSFER_CEILING: Kobo = 50_000_000;

/// Default per-transaction funding ceiling (kobo)
pub const DEFAULT_FUNDING_CEILING: Kobo = 100_000_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeePolicy {
    /// Fixed fee charged on top of every external payout
    pub external_fee: Kobo,
    /// Maximum amount of a single transfer (internal or external)
    pub transfer_ceiling: Kobo,
    /// Maximum amount of a single funding payment
    pub funding_ceiling: Kobo,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            external_fee: DEFAULT_EXTERNAL_FEE,
            transfer_ceiling: DEFAULT_TRANSFER_CEILING,
            funding_ceiling: DEFAULT_FUNDING_CEILING,
        }
    }
}

impl FeePolicy {
    /// Validate a transfer amount against positivity and the ceiling
    pub fn check_transfer_amount(&self, amount: Kobo) -> Result<(), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }
        if amount > self.transfer_ceiling {
            return Err(WalletError::AmountAboveCeiling {
                amount,
                ceiling: self.transfer_ceiling,
            });
        }
        Ok(())
    }

    /// Validate a funding amount against positivity and the ceiling
    pub fn check_funding_amount(&self, amount: Kobo) -> Result<(), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }
        if amount > self.funding_ceiling {
            return Err(WalletError::AmountAboveCeiling {
                amount,
                ceiling: self.funding_ceiling,
            });
        }
        Ok(())
    }

    /// Total debit an external payout costs the sender: amount + fixed fee
    pub fn external_total(&self, amount: Kobo) -> Result<Kobo, WalletError> {
        amount
            .checked_add(self.external_fee)
            .ok_or(WalletError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> FeePolicy {
        FeePolicy {
            external_fee: 50,
            transfer_ceiling: 10_000,
            funding_ceiling: 20_000,
        }
    }

    #[test]
    fn test_transfer_amount_checks() {
        let p = policy();
        assert!(p.check_transfer_amount(1).is_ok());
        assert!(p.check_transfer_amount(10_000).is_ok());
        assert_eq!(
            p.check_transfer_amount(0),
            Err(WalletError::InvalidAmount)
        );
        assert_eq!(
            p.check_transfer_amount(10_001),
            Err(WalletError::AmountAboveCeiling {
                amount: 10_001,
                ceiling: 10_000
            })
        );
    }

    #[test]
    fn test_funding_amount_checks() {
        let p = policy();
        assert!(p.check_funding_amount(20_000).is_ok());
        assert!(p.check_funding_amount(20_001).is_err());
        assert!(p.check_funding_amount(0).is_err());
    }

    #[test]
    fn test_external_total() {
        let p = policy();
        assert_eq!(p.external_total(1_000).unwrap(), 1_050);
        assert_eq!(p.external_total(u64::MAX), Err(WalletError::Overflow));
    }
}
