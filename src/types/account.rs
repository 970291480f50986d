//! Account types for the transfer engine
//!
//! This module defines the `Account` structure: an identity-bearing balance
//! cell whose balance is protected by its own mutex. The mutex is the unit of
//! mutual exclusion for the whole engine; every read or write of a balance
//! goes through a [`BalanceGuard`] obtained from [`Account::lock_balance`].

use crate::types::LedgerError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Account identifier (u32: 0-4,294,967,295)
///
/// Immutable and unique per account. The total order over ids doubles as the
/// canonical lock-acquisition order used by the transfer coordinator.
pub type AccountId = u32;

/// Shared handle to an account
///
/// Accounts are shared across worker threads; `Arc` keeps them alive for the
/// duration of the run (accounts are never destroyed mid-scenario).
pub type AccountHandle = Arc<Account>;

/// An account: an id plus a mutex-protected balance
///
/// The account itself performs no locking decisions beyond handing out its
/// guard. Deadlock avoidance, sufficiency checks, and atomicity across two
/// accounts are the coordinator's responsibility.
///
/// # Thread Safety
///
/// The balance is only reachable through [`Account::lock_balance`], so the
/// invariant "balance is only read or written while this account's lock is
/// held" is enforced by the type system rather than by convention.
#[derive(Debug)]
pub struct Account {
    /// Immutable identity, used as the lock-ordering key
    id: AccountId,

    /// Current balance, guarded by this account's lock
    balance: Mutex<i64>,
}

impl Account {
    /// Create a new account with the given id and initial balance
    pub fn new(id: AccountId, initial_balance: i64) -> Self {
        Account {
            id,
            balance: Mutex::new(initial_balance),
        }
    }

    /// The account's immutable identifier
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Acquire this account's lock and return a guard over the balance
    ///
    /// Blocks until the lock is available. A poisoned lock is recovered:
    /// transfers either commit both balance updates or neither, so the value
    /// behind a poisoned mutex is still consistent.
    pub fn lock_balance(&self) -> BalanceGuard<'_> {
        BalanceGuard {
            inner: self.balance.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Snapshot of the current balance
    ///
    /// Acquires and immediately releases the lock. Only meaningful as an
    /// observation when no transfer touching this account is in flight.
    pub fn balance(&self) -> i64 {
        *self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive access to one account's balance
///
/// Holding a `BalanceGuard` means holding that account's lock. The mutation
/// primitives below are deliberately non-atomic across accounts: a transfer
/// holds two guards and calls [`withdraw`](BalanceGuard::withdraw) on one and
/// [`deposit`](BalanceGuard::deposit) on the other.
#[derive(Debug)]
pub struct BalanceGuard<'a> {
    inner: MutexGuard<'a, i64>,
}

impl BalanceGuard<'_> {
    /// The balance as seen under this lock
    pub fn balance(&self) -> i64 {
        *self.inner
    }

    /// Increase the balance by `amount`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is negative
    /// - Adding `amount` to the balance would overflow
    pub fn deposit(&mut self, amount: i64) -> Result<(), LedgerError> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount("deposit", amount));
        }

        *self.inner = self
            .inner
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit"))?;

        Ok(())
    }

    /// Decrease the balance by `amount`
    ///
    /// Does not check that the balance stays non-negative: the sufficiency
    /// check belongs to the coordinator, which performs it under both locks
    /// so that check and mutation form one atomic step.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is negative
    /// - Subtracting `amount` from the balance would underflow
    pub fn withdraw(&mut self, amount: i64) -> Result<(), LedgerError> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount("withdraw", amount));
        }

        *self.inner = self
            .inner
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_underflow("withdraw"))?;

        Ok(())
    }
}
