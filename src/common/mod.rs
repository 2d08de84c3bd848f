// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

pub mod parsing;
pub mod units;

// Shared aliases for frequently used modules.
pub use crate::domain::error;
