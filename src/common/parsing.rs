// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use alloy::primitives::Address;
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Accepts any casing; mixed-case input is not checksum-validated.
pub fn parse_address_hex(s: &str) -> Result<Address, AppError> {
    let trimmed = s.trim();
    let body = strip_0x(trimmed);
    if body.len() != 40 {
        return Err(AppError::InvalidAddress(trimmed.to_string()));
    }
    Address::from_str(body).map_err(|_| AppError::InvalidAddress(trimmed.to_string()))
}

/// Canonical lowercase 0x-prefixed form used in every boundary view.
pub fn canonical_hex(address: Address) -> String {
    format!("{:#x}", address)
}
