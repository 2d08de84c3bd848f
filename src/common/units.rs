// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use alloy::primitives::U256;
use alloy::primitives::utils::{ParseUnits, format_units, parse_units};

/// Human decimal string -> smallest token unit.
pub fn to_base_units(field: &str, amount: &str, decimals: u8) -> Result<U256, AppError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation {
            field: field.to_string(),
            message: "amount is empty".to_string(),
        });
    }
    match parse_units(trimmed, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(AppError::Validation {
            field: field.to_string(),
            message: format!("amount {trimmed} is negative"),
        }),
        Err(e) => Err(AppError::Validation {
            field: field.to_string(),
            message: format!("amount {trimmed} is not a decimal number: {e}"),
        }),
    }
}

/// Smallest token unit -> human decimal string, trailing zeros trimmed.
pub fn format_base_units(value: U256, decimals: u8) -> String {
    match format_units(value, decimals) {
        Ok(formatted) => trim_fraction(formatted),
        Err(_) => value.to_string(),
    }
}

fn trim_fraction(mut formatted: String) -> String {
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    formatted
}
