//! Thread-safe account registry
//!
//! This module provides the `AccountRegistry` struct, which owns every
//! account in the system and hands out shared handles to them.
//!
//! # Design
//!
//! The registry uses `DashMap` (a concurrent HashMap) so that account lookup
//! never contends with in-flight transfers: the map synchronizes creation and
//! lookup of handles, while each account's own mutex synchronizes its
//! balance. The registry never holds an account's balance lock.
//!
//! # Thread Safety
//!
//! All operations are safe to call from multiple threads concurrently.

use crate::types::{Account, AccountHandle, AccountId, LedgerError};
use dashmap::DashMap;
use std::sync::Arc;

/// Owns all accounts and resolves ids to shared handles
///
/// Accounts are created once at setup time and live for the duration of the
/// process; there is no removal operation.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    /// Concurrent map of account ids to shared account handles
    accounts: DashMap<AccountId, AccountHandle>,
}

impl AccountRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        AccountRegistry {
            accounts: DashMap::new(),
        }
    }

    /// Create an account with the given id and opening balance
    ///
    /// # Arguments
    ///
    /// * `id` - Unique account identifier; also the lock-ordering key
    /// * `initial_balance` - Opening balance, must be non-negative
    ///
    /// # Returns
    ///
    /// A shared handle to the newly created account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An account with this id already exists
    /// - The opening balance is negative
    pub fn create_account(
        &self,
        id: AccountId,
        initial_balance: i64,
    ) -> Result<AccountHandle, LedgerError> {
        if initial_balance < 0 {
            return Err(LedgerError::invalid_initial_balance(id, initial_balance));
        }

        let handle = Arc::new(Account::new(id, initial_balance));
        let mut created = false;
        self.accounts.entry(id).or_insert_with(|| {
            created = true;
            Arc::clone(&handle)
        });

        if created {
            Ok(handle)
        } else {
            Err(LedgerError::duplicate_account(id))
        }
    }

    /// Look up an account by id
    ///
    /// Returns `None` if no account with this id was ever created. The
    /// returned handle is a clone; holding it does not block other lookups.
    pub fn get(&self, id: AccountId) -> Option<AccountHandle> {
        self.accounts.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of accounts in the registry
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the registry holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances
    ///
    /// Each account is locked briefly and in turn, never two at once. The
    /// result is exact at any observation point where no transfer is in
    /// flight (the conservation invariant's observation points); during
    /// concurrent transfers it is only a momentary snapshot.
    pub fn total_balance(&self) -> i64 {
        self.accounts
            .iter()
            .map(|entry| entry.value().balance())
            .sum()
    }

    /// All account ids, sorted ascending
    ///
    /// Sorted so that reports and demo output are deterministic.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.accounts.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }
}
