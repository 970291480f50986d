//! Rust Transfer Engine Library
//! # Overview
//!
//! A single-process, multi-threaded in-memory ledger primitive: transfers
//! move value between two accounts atomically with respect to all other
//! concurrent transfers, without deadlock and without ever violating the
//! conservation invariant (the sum of all balances is constant across any
//! set of committed transfers, under any interleaving).
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, BalanceGuard, TransferOutcome, LedgerError)
//! - [`core`] - Engine components:
//!   - [`core::registry`] - Account creation and id resolution
//!   - [`core::coordinator`] - The ordered locking protocol (and the naive
//!     comparison path kept for deadlock characterization)
//!   - [`core::telemetry`] - Injectable outcome-event sink
//! - [`harness`] - Concurrent workload driver, conservation checks, and the
//!   bounded-wait liveness probe used to detect deadlock externally
//! - [`cli`] - Arguments for the demo binary
//!
//! # Locking Protocol
//!
//! One mutex per account, and at most two locks per transfer, always
//! acquired in ascending account-id order. The fixed total order makes the
//! wait-for graph among concurrent transfers acyclic, which eliminates the
//! circular wait deadlock requires. Validation runs before any acquisition;
//! the sufficiency check and both balance updates run under both locks, so
//! no partial commit is ever observable.

// Module declarations
pub mod cli;
pub mod core;
pub mod harness;
pub mod types;

pub use core::{AccountRegistry, TelemetrySink, TransferCoordinator};
pub use harness::{run_workload, TransferJob, WorkloadReport};
pub use types::{Account, AccountHandle, AccountId, LedgerError, TransferOutcome};
