//! Money Conversion Module
//!
//! All monetary amounts are `u64` kobo (the smallest currency unit)
//! internally. Conversion to and from major-unit strings/decimals happens
//! only at the presentation boundary, and only through this module.
//!
//! ## Design Principles
//! 1. Explicit Error Handling: no silent truncation
//! 2. Strict precision: at most [`SCALE`] decimal places accepted
//! 3. Zero and negative amounts are rejected at parse time

use rust_decimal::prelude::*;
use thiserror::Error;

/// Internal monetary unit: 1 major unit = 100 kobo
pub type Kobo = u64;

/// Decimal places of the major unit
pub const SCALE: u32 = 2;

const MULTIPLIER: u64 = 100;

/// Money conversion errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Convert a client-provided major-unit string (e.g. "150.25") to kobo.
///
/// # Errors
/// * `PrecisionOverflow` - more than [`SCALE`] decimal places
/// * `InvalidAmount` - zero or signed input
/// * `Overflow` - result would overflow u64
/// * `InvalidFormat` - malformed string
pub fn parse_amount(amount_str: &str) -> Result<Kobo, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let parts: Vec<&str> = amount_str.split('.').collect();
    let (whole, frac) = match parts.len() {
        1 => (parts[0], ""),
        2 => {
            // Require both sides of the dot to be non-empty: rejects ".5" and "5."
            if parts[0].is_empty() || parts[1].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "both sides of the decimal point must be present".into(),
                ));
            }
            (parts[0], parts[1])
        }
        _ => return Err(MoneyError::InvalidFormat("multiple decimal points".into())),
    };

    // REJECT excess precision, never truncate
    if frac.len() > SCALE as usize {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len() as u32,
            max: SCALE,
        });
    }

    let whole_num: u64 = whole.parse::<u64>().map_err(|e| {
        if e.to_string().contains("too large") {
            MoneyError::Overflow
        } else {
            MoneyError::InvalidFormat(format!("invalid character in whole part: {}", whole))
        }
    })?;

    let frac_num: u64 = if frac.is_empty() {
        0
    } else {
        let frac_padded = format!("{:0<width$}", frac, width = SCALE as usize);
        frac_padded
            .parse::<u64>()
            .map_err(|_| MoneyError::InvalidFormat("invalid fractional part".into()))?
    };

    let amount = whole_num
        .checked_mul(MULTIPLIER)
        .and_then(|v| v.checked_add(frac_num))
        .ok_or(MoneyError::Overflow)?;

    if amount == 0 {
        return Err(MoneyError::InvalidAmount);
    }

    Ok(amount)
}

/// Convert a `Decimal` (the JSON boundary representation) to kobo.
pub fn parse_decimal(decimal: Decimal) -> Result<Kobo, MoneyError> {
    if decimal.is_sign_negative() || decimal.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }

    if decimal.normalize().scale() > SCALE {
        return Err(MoneyError::PrecisionOverflow {
            provided: decimal.scale(),
            max: SCALE,
        });
    }

    let scaled = decimal * Decimal::from(MULTIPLIER);
    scaled.to_u64().ok_or(MoneyError::Overflow)
}

/// Format kobo as a major-unit string, e.g. `15025` -> "150.25"
pub fn format_kobo(value: Kobo) -> String {
    format!("{}.{:02}", value / MULTIPLIER, value % MULTIPLIER)
}

/// Format kobo as a `Decimal` major-unit value
pub fn to_decimal(value: Kobo) -> Decimal {
    Decimal::from(value) / Decimal::from(MULTIPLIER)
}
