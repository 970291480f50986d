//! Transfer coordination
//!
//! This module provides the `TransferCoordinator`, which executes a transfer
//! between two accounts with deadlock-free mutual exclusion and with the
//! sufficient-funds check performed atomically with the mutation.
//!
//! The coordinator enforces the engine's locking protocol:
//! - Validation happens before any lock is taken
//! - Both account locks are acquired in canonical order (lower id first)
//! - The sufficiency check and both balance updates happen under both locks
//! - A call never holds more than two locks
//!
//! Acquiring locks in a fixed total order over account ids keeps the
//! wait-for graph among concurrent transfers acyclic, which rules out the
//! circular wait required for deadlock. The [`naive_transfer`] path drops
//! that ordering on purpose; it exists only so tests and the demo binary can
//! reproduce the failure mode the safe path avoids.
//!
//! [`naive_transfer`]: TransferCoordinator::naive_transfer

use crate::core::registry::AccountRegistry;
use crate::core::telemetry::{NoopTelemetry, TelemetrySink};
use crate::types::{Account, AccountHandle, AccountId, BalanceGuard, TransferOutcome};
use std::sync::Arc;
use std::time::Instant;

/// Executes transfers between accounts under the ordered locking protocol
///
/// The coordinator is the only component allowed to mutate balances. It holds
/// the account registry for id resolution and an injected telemetry sink that
/// receives one event per finished call.
///
/// # Thread Safety
///
/// All methods take `&self`; a coordinator wrapped in `Arc` can be shared
/// across any number of worker threads. Every `transfer` call eventually
/// returns no matter how many callers run concurrently or in which direction
/// they transfer.
pub struct TransferCoordinator {
    /// Resolves account ids to shared handles
    registry: Arc<AccountRegistry>,

    /// Receives one event per finished call, after lock release
    telemetry: Arc<dyn TelemetrySink>,
}

impl TransferCoordinator {
    /// Create a coordinator with no telemetry
    pub fn new(registry: Arc<AccountRegistry>) -> Self {
        Self::with_telemetry(registry, Arc::new(NoopTelemetry))
    }

    /// Create a coordinator with an injected telemetry sink
    pub fn with_telemetry(registry: Arc<AccountRegistry>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        TransferCoordinator {
            registry,
            telemetry,
        }
    }

    /// The registry this coordinator resolves accounts against
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Move `amount` from `source` to `destination` atomically
    ///
    /// Both balance updates happen while both account locks are held, so no
    /// observer ever sees the source debited without the destination
    /// credited or vice versa.
    ///
    /// # Arguments
    ///
    /// * `source` - Account to debit
    /// * `destination` - Account to credit (may equal `source`; a
    ///   self-transfer commits without changing any balance)
    /// * `amount` - Must be positive
    ///
    /// # Returns
    ///
    /// * `Success` - Both balances updated (or a committed self-transfer)
    /// * `InsufficientFunds` - Source balance below `amount`; no mutation
    /// * `InvalidArgument` - Non-positive amount or unknown account id,
    ///   detected before any lock is taken; no mutation
    pub fn transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
    ) -> TransferOutcome {
        let started = Instant::now();
        let outcome = self.transfer_in_canonical_order(source, destination, amount);
        self.telemetry
            .on_transfer_outcome("transfer", started.elapsed(), outcome);
        outcome
    }

    /// Like [`transfer`](Self::transfer), but locks in caller-supplied order
    ///
    /// Lock acquisition follows the `(source, destination)` argument order
    /// instead of the canonical id order. Two threads calling this in
    /// opposite directions can each take their first lock and then wait
    /// forever for the other's second lock.
    ///
    /// Retained as a negative example and test fixture only; correct callers
    /// use [`transfer`](Self::transfer).
    pub fn naive_transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
    ) -> TransferOutcome {
        self.naive_transfer_with_handoff(source, destination, amount, || {})
    }

    /// [`naive_transfer`](Self::naive_transfer) with a handoff hook
    ///
    /// Runs `after_first_lock` once the first lock is held, before attempting
    /// the second. Tests pass a `Barrier::wait` here so two opposing calls
    /// are forced into the circular-wait interleaving deterministically
    /// instead of relying on a wall-clock race.
    pub fn naive_transfer_with_handoff<F>(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
        after_first_lock: F,
    ) -> TransferOutcome
    where
        F: FnOnce(),
    {
        let started = Instant::now();
        let outcome =
            self.transfer_in_argument_order(source, destination, amount, after_first_lock);
        self.telemetry
            .on_transfer_outcome("naive_transfer", started.elapsed(), outcome);
        outcome
    }

    /// Safe path: validate, lock in canonical order, commit
    fn transfer_in_canonical_order(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
    ) -> TransferOutcome {
        let Some((source, destination)) = self.validate(source, destination, amount) else {
            return TransferOutcome::InvalidArgument;
        };

        if source.id() == destination.id() {
            return Self::self_transfer(&source, amount);
        }

        let (mut src, mut dst) = Self::lock_in_canonical_order(&source, &destination);
        Self::commit(&mut src, &mut dst, amount)
    }

    /// Naive path: validate, lock in argument order, commit
    fn transfer_in_argument_order<F>(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
        after_first_lock: F,
    ) -> TransferOutcome
    where
        F: FnOnce(),
    {
        let Some((source, destination)) = self.validate(source, destination, amount) else {
            return TransferOutcome::InvalidArgument;
        };

        if source.id() == destination.id() {
            return Self::self_transfer(&source, amount);
        }

        let mut src = source.lock_balance();
        after_first_lock();
        // Circular-wait window: another thread may already hold the
        // destination lock while waiting on ours.
        let mut dst = destination.lock_balance();
        Self::commit(&mut src, &mut dst, amount)
    }

    /// Validate inputs and resolve handles before any lock is taken
    ///
    /// Returns `None` for a non-positive amount or an id that does not refer
    /// to a created account (the absent-reference case).
    fn validate(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: i64,
    ) -> Option<(AccountHandle, AccountHandle)> {
        if amount <= 0 {
            return None;
        }
        let source = self.registry.get(source)?;
        let destination = self.registry.get(destination)?;
        Some((source, destination))
    }

    /// Acquire both locks, lower id first
    ///
    /// Returns the guards in `(source, destination)` order regardless of
    /// which lock was taken first. Callers must ensure the ids differ.
    fn lock_in_canonical_order<'a>(
        source: &'a Account,
        destination: &'a Account,
    ) -> (BalanceGuard<'a>, BalanceGuard<'a>) {
        if source.id() < destination.id() {
            let src = source.lock_balance();
            let dst = destination.lock_balance();
            (src, dst)
        } else {
            let dst = destination.lock_balance();
            let src = source.lock_balance();
            (src, dst)
        }
    }

    /// Transfer where source and destination are the same account
    ///
    /// A single lock acquisition suffices (locking the same mutex twice would
    /// self-deadlock). The sufficiency check still applies; a committed
    /// self-transfer changes no balance.
    fn self_transfer(account: &Account, amount: i64) -> TransferOutcome {
        let guard = account.lock_balance();
        if guard.balance() >= amount {
            TransferOutcome::Success
        } else {
            TransferOutcome::InsufficientFunds
        }
    }

    /// Check sufficiency and update both balances under both locks
    fn commit(
        source: &mut BalanceGuard<'_>,
        destination: &mut BalanceGuard<'_>,
        amount: i64,
    ) -> TransferOutcome {
        if source.balance() < amount {
            return TransferOutcome::InsufficientFunds;
        }

        // Amount was validated positive and the balance covers it, so the
        // withdrawal cannot underflow.
        if source.withdraw(amount).is_err() {
            return TransferOutcome::InvalidArgument;
        }

        if destination.deposit(amount).is_err() {
            // Deposit overflowed: undo the withdrawal while both locks are
            // still held so neither balance moves. Restoring the amount just
            // subtracted cannot fail.
            let _ = source.deposit(amount);
            return TransferOutcome::InvalidArgument;
        }

        TransferOutcome::Success
    }
}
