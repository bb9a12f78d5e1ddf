//! ENFORCED BALANCE TYPE
//!
//! This is the SINGLE source of truth for balance arithmetic. ALL balance
//! mutations MUST go through these methods.
//!
//! # Enforcement Strategy:
//! 1. Field is PRIVATE - no direct access
//! 2. All mutations return Result - errors are explicit
//! 3. Version auto-increments - audit trail
//! 4. checked_add/sub - overflow protection
//! 5. Unsigned representation - a negative balance is unrepresentable

use serde::{Deserialize, Serialize};

use crate::money::Kobo;

/// Current balance of one wallet, in kobo.
///
/// # Invariants (ENFORCED by the private field):
/// - Balance is never negative (u64 by construction)
/// - No overflow/underflow (checked arithmetic)
/// - `version` increments on every successful mutation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    kobo: Kobo,
    version: u64,
}

impl Balance {
    /// Current balance in kobo (read-only)
    #[inline(always)]
    pub const fn kobo(&self) -> Kobo {
        self.kobo
    }

    /// Mutation counter (read-only)
    #[inline(always)]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Increase the balance.
    ///
    /// # Errors
    /// Returns the unchanged balance as `Err` context on overflow.
    pub fn credit(&mut self, amount: Kobo) -> Result<Kobo, &'static str> {
        self.kobo = self.kobo.checked_add(amount).ok_or("Credit overflow")?;
        self.version = self.version.wrapping_add(1);
        Ok(self.kobo)
    }

    /// Decrease the balance.
    ///
    /// The sufficiency check and the write are one operation on an
    /// exclusively borrowed value; callers hold the wallet lock for the
    /// whole call, so no stale-read race is possible.
    ///
    /// # Errors
    /// - "Insufficient funds" if the balance does not cover `amount`
    pub fn debit(&mut self, amount: Kobo) -> Result<Kobo, &'static str> {
        if self.kobo < amount {
            return Err("Insufficient funds");
        }
        self.kobo = self.kobo.checked_sub(amount).ok_or("Debit underflow")?;
        self.version = self.version.wrapping_add(1);
        Ok(self.kobo)
    }

    /// Whether the balance covers `amount`
    #[inline(always)]
    pub const fn covers(&self, amount: Kobo) -> bool {
        self.kobo >= amount
    }
}
