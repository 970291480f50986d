//! Error types for the transfer engine
//!
//! This module defines all error types that can occur outside the transfer
//! hot path. Expected transfer failures (insufficient funds, bad arguments)
//! are reported as [`TransferOutcome`](crate::types::TransferOutcome) values,
//! not errors; `LedgerError` covers account setup and the balance primitives.
//!
//! # Error Categories
//!
//! - **Setup Errors**: duplicate account ids, negative opening balances
//! - **Lookup Errors**: references to accounts that were never created
//! - **Arithmetic Errors**: overflow/underflow in balance mutations

use crate::types::AccountId;
use thiserror::Error;

/// Main error type for the transfer engine
///
/// Each variant carries enough context to diagnose the failure from the
/// message alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A balance primitive was called with a negative amount
    ///
    /// Both `deposit` and `withdraw` require non-negative amounts; direction
    /// is expressed by choosing the primitive, never by the sign.
    #[error("{operation} amount cannot be negative (got {amount})")]
    InvalidAmount {
        /// Operation that rejected the amount
        operation: String,
        /// The offending amount
        amount: i64,
    },

    /// Arithmetic overflow would occur
    ///
    /// The mutation is rejected and the balance is left unchanged.
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// Arithmetic underflow would occur
    ///
    /// The mutation is rejected and the balance is left unchanged.
    #[error("arithmetic underflow in {operation}")]
    ArithmeticUnderflow {
        /// Operation that would underflow
        operation: String,
    },

    /// An account with this id already exists
    #[error("account {account} already exists")]
    DuplicateAccount {
        /// The conflicting account id
        account: AccountId,
    },

    /// No account with this id was ever created
    #[error("account {account} does not exist")]
    UnknownAccount {
        /// The missing account id
        account: AccountId,
    },

    /// Accounts cannot be opened with a negative balance
    #[error("account {account} cannot open with negative balance {balance}")]
    InvalidInitialBalance {
        /// The account id being created
        account: AccountId,
        /// The rejected opening balance
        balance: i64,
    },
}

// Helper constructors for common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str, amount: i64) -> Self {
        LedgerError::InvalidAmount {
            operation: operation.to_string(),
            amount,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticUnderflow error
    pub fn arithmetic_underflow(operation: &str) -> Self {
        LedgerError::ArithmeticUnderflow {
            operation: operation.to_string(),
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: AccountId) -> Self {
        LedgerError::DuplicateAccount { account }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId) -> Self {
        LedgerError::UnknownAccount { account }
    }

    /// Create an InvalidInitialBalance error
    pub fn invalid_initial_balance(account: AccountId, balance: i64) -> Self {
        LedgerError::InvalidInitialBalance { account, balance }
    }
}
