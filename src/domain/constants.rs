// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

// =============================================================================
// PRICING CONSTANTS
// =============================================================================

/// Constant-product fee: 0.3% taken from the input side.
pub const FEE_NUMERATOR: u64 = 997;
pub const FEE_DENOMINATOR: u64 = 1000;

// =============================================================================
// TOKEN CONSTANTS
// =============================================================================

/// Pair LP tokens and the faucet tokens are all 18-decimal.
pub const DEFAULT_DECIMALS: u8 = 18;
pub const LP_DECIMALS: u8 = 18;

/// Whole tokens minted per faucet call.
pub const DEFAULT_FAUCET_TOKENS: u64 = 100;

// =============================================================================
// RECEIPT CONSTANTS
// =============================================================================

pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;
/// Zero disables the wait budget; unconfirmed steps block indefinitely.
pub const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 0;
