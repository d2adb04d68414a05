// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Wallet transaction repository.
//!
//! Deposits and withdrawals are recorded as pending rows. Settlement happens
//! out of band: an admin reviews the pending row and adjusts the user's
//! wallet balances through the admin API.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreResult, TRANSACTIONS};

/// Direction of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

/// Lifecycle state of a wallet transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Transaction row. Returned verbatim in the profile payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredTransaction {
    pub id: u64,
    pub user_id: u64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub currency: String,
    pub network: String,
    pub wallet_address: String,
    pub commission: f64,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Repository for wallet transactions.
pub struct TransactionRepository<'a> {
    db: &'a Database,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record a pending transaction.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        user_id: u64,
        transaction_type: TransactionType,
        amount: f64,
        currency: &str,
        network: &str,
        wallet_address: &str,
        commission: f64,
    ) -> StoreResult<StoredTransaction> {
        let write_txn = self.db.begin_write()?;
        let transaction = {
            let id = next_id(&write_txn, "transactions")?;
            let transaction = StoredTransaction {
                id,
                user_id,
                transaction_type,
                amount,
                currency: currency.to_owned(),
                network: network.to_owned(),
                wallet_address: wallet_address.to_owned(),
                commission,
                status: TransactionStatus::Pending,
                created_at: Utc::now(),
            };
            let mut table = write_txn.open_table(TRANSACTIONS)?;
            table.insert(id, serde_json::to_vec(&transaction)?.as_slice())?;
            transaction
        };
        write_txn.commit()?;
        Ok(transaction)
    }

    /// List a user's transactions in insertion order.
    pub fn list_by_user(&self, user_id: u64) -> StoreResult<Vec<StoredTransaction>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS)?;

        let mut transactions = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let transaction: StoredTransaction = serde_json::from_slice(value.value())?;
            if transaction.user_id == user_id {
                transactions.push(transaction);
            }
        }
        Ok(transactions)
    }
}
