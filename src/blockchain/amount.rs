// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversions between human-readable amounts and on-chain integer units.

use alloy::primitives::U256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Too many decimal places (max {0})")]
    TooManyDecimals(u8),

    #[error("Amount overflow")]
    Overflow,
}

/// Parse a human-readable amount (e.g. `"1.5"`) into chain units.
pub fn to_chain_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals(decimals));
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| AmountError::Overflow)?
    };
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| AmountError::Overflow)?
    };

    whole
        .checked_mul(pow10(decimals))
        .and_then(|w| w.checked_add(fraction))
        .ok_or(AmountError::Overflow)
}

/// Format chain units as a human-readable amount, trailing zeros trimmed.
pub fn from_chain_units(amount: U256, decimals: u8) -> String {
    let (whole, remainder) = split(amount, decimals);
    if remainder.is_zero() {
        return whole.to_string();
    }
    let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
    format!("{}.{}", whole, decimal_str.trim_end_matches('0'))
}

/// Format chain units with exactly `places` fractional digits (truncating).
pub fn to_fixed(amount: U256, decimals: u8, places: usize) -> String {
    let (whole, remainder) = split(amount, decimals);
    if places == 0 {
        return whole.to_string();
    }
    let mut fraction = if decimals == 0 {
        String::new()
    } else {
        format!("{:0>width$}", remainder, width = decimals as usize)
    };
    fraction.truncate(places);
    format!("{whole}.{fraction:0<places$}")
}

/// Zero with `decimals` fractional digits: `"0"`, `"0.0"`, `"0.000000"`...
pub fn zero_fixed(decimals: u8) -> String {
    to_fixed(U256::ZERO, 0, decimals as usize)
}

fn split(amount: U256, decimals: u8) -> (U256, U256) {
    let divisor = pow10(decimals);
    (amount / divisor, amount % divisor)
}

fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}
