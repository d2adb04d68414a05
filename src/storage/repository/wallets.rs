// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Wallet repository.
//!
//! One wallet per user, keyed by user id. Balances are only ever changed by
//! the admin override; deposits and withdrawals record transactions without
//! touching the wallet.

use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{StoreResult, WALLETS};

/// Wallet row. Exposed directly by the API; contains no secrets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredWallet {
    pub user_id: u64,
    pub personal_balance: f64,
    pub sponsor_balance: f64,
}

impl StoredWallet {
    /// Fresh zero-balance wallet for a new user.
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            personal_balance: 0.0,
            sponsor_balance: 0.0,
        }
    }
}

/// Repository for wallet operations.
pub struct WalletRepository<'a> {
    db: &'a Database,
}

impl<'a> WalletRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Look up a user's wallet.
    pub fn get(&self, user_id: u64) -> StoreResult<Option<StoredWallet>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Overwrite both balances of a user's wallet.
    ///
    /// Returns `false` when the user has no wallet row; the caller treats
    /// that as a no-op rather than an error.
    pub fn set_balances(
        &self,
        user_id: u64,
        personal_balance: f64,
        sponsor_balance: f64,
    ) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(WALLETS)?;
            let existing = match table.get(user_id)? {
                Some(value) => {
                    let wallet: StoredWallet = serde_json::from_slice(value.value())?;
                    Some(wallet)
                }
                None => None,
            };
            match existing {
                Some(mut wallet) => {
                    wallet.personal_balance = personal_balance;
                    wallet.sponsor_balance = sponsor_balance;
                    table.insert(user_id, serde_json::to_vec(&wallet)?.as_slice())?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::storage::Store;

    fn temp_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn set_balances_overwrites_both_fields() {
        let (store, _dir) = temp_store();
        let user = store
            .users()
            .create("a@x.com", "hash", "s", Role::User)
            .unwrap();

        let updated = store.wallets().set_balances(user.id, 150.5, 20.0).unwrap();
        assert!(updated);

        let wallet = store.wallets().get(user.id).unwrap().unwrap();
        assert_eq!(wallet.personal_balance, 150.5);
        assert_eq!(wallet.sponsor_balance, 20.0);
    }

    #[test]
    fn set_balances_on_missing_wallet_is_a_noop() {
        let (store, _dir) = temp_store();
        let updated = store.wallets().set_balances(999, 10.0, 10.0).unwrap();
        assert!(!updated);
        assert!(store.wallets().get(999).unwrap().is_none());
    }
}
