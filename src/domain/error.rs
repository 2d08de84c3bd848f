// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::step::ActionReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Read {method} on {target} failed: {reason}")]
    ReadFailure {
        method: String,
        target: String,
        reason: String,
    },

    #[error("Insufficient balance of {token}. Required: {required}, Available: {available}")]
    InsufficientBalance {
        token: String,
        required: String,
        available: String,
    },

    #[error("No liquidity: {0}")]
    NoLiquidity(String),

    /// Raw rejection from the signer or node, before it is attributed to a step.
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// `report` holds every step attempted so far; the last one is `Failed`.
    #[error("{action} rejected at step '{step}': {reason}")]
    TransactionRejected {
        action: String,
        step: String,
        reason: String,
        report: Box<ActionReport>,
    },

    #[error("{action} step '{step}' not confirmed after {waited_ms}ms (tx {hash})")]
    ReceiptTimeout {
        action: String,
        step: String,
        hash: String,
        waited_ms: u64,
        report: Box<ActionReport>,
    },

    #[error("{action} step '{step}' receipt unavailable (tx {hash}): {reason}")]
    ReceiptUnavailable {
        action: String,
        step: String,
        hash: String,
        reason: String,
        report: Box<ActionReport>,
    },

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),
}

impl AppError {
    pub fn read_failure(method: &str, target: impl std::fmt::LowerHex, reason: impl ToString) -> Self {
        AppError::ReadFailure {
            method: method.to_string(),
            target: format!("{:#x}", target),
            reason: reason.to_string(),
        }
    }

    /// Steps of an action that stopped part way, including those already confirmed.
    pub fn partial_report(&self) -> Option<&ActionReport> {
        match self {
            AppError::TransactionRejected { report, .. }
            | AppError::ReceiptTimeout { report, .. }
            | AppError::ReceiptUnavailable { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Chain-provided message when one exists, otherwise the rendered error.
    pub fn chain_message(&self) -> String {
        match self {
            AppError::Submission(msg) if !msg.trim().is_empty() => msg.clone(),
            AppError::Submission(_) => "transaction rejected".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::ActionKind;
    use alloy::primitives::Address;

    #[test]
    fn read_failure_renders_lowercase_target() {
        let target = Address::repeat_byte(0xAB);
        let err = AppError::read_failure("token0", target, "timeout");
        match err {
            AppError::ReadFailure { method, target, .. } => {
                assert_eq!(method, "token0");
                assert_eq!(target, format!("0x{}", "ab".repeat(20)));
            }
            other => panic!("Unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn empty_submission_message_falls_back_to_generic_label() {
        assert_eq!(
            AppError::Submission("  ".into()).chain_message(),
            "transaction rejected"
        );
        assert_eq!(
            AppError::Submission("execution reverted: K".into()).chain_message(),
            "execution reverted: K"
        );
    }

    #[test]
    fn only_step_failures_carry_a_partial_report() {
        let err = AppError::ReceiptUnavailable {
            action: "swap".into(),
            step: "transfer tokenIn".into(),
            hash: "0x01".into(),
            reason: "node unavailable".into(),
            report: Box::new(ActionReport::new(ActionKind::Swap)),
        };
        assert_eq!(err.partial_report().map(|r| r.action), Some(ActionKind::Swap));
        assert!(err.to_string().contains("transfer tokenIn"));
        assert!(AppError::NoLiquidity("x".into()).partial_report().is_none());
    }
}
