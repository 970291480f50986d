//! Types module
//!
//! Contains core data structures used throughout the engine.
//! This module organizes types into logical submodules:
//! - `account`: Account, balance guard, and identifier types
//! - `outcome`: Transfer outcome reporting
//! - `error`: Error types for setup and balance primitives

pub mod account;
pub mod error;
pub mod outcome;

pub use account::{Account, AccountHandle, AccountId, BalanceGuard};
pub use error::LedgerError;
pub use outcome::TransferOutcome;
