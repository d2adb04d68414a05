// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! User repository.
//!
//! Registration writes the user row, the email uniqueness index, and the
//! user's zero-balance wallet in a single write transaction, so a partial
//! failure can never leave a user without a wallet.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreError, StoreResult, USERS, USERS_BY_EMAIL, WALLETS};
use super::wallets::StoredWallet;
use crate::auth::Role;

/// User row as persisted. Never returned by the API directly; see
/// [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub secret_key: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Safe projection returned to API clients (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a user and their wallet atomically.
    ///
    /// # Errors
    /// Returns `StoreError::EmailTaken` when the email is already registered.
    pub fn create(
        &self,
        email: &str,
        password_hash: &str,
        secret_key: &str,
        role: Role,
    ) -> StoreResult<StoredUser> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut index = write_txn.open_table(USERS_BY_EMAIL)?;
            if index.get(email)?.is_some() {
                return Err(StoreError::EmailTaken);
            }

            let id = next_id(&write_txn, "users")?;
            let user = StoredUser {
                id,
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
                secret_key: secret_key.to_owned(),
                role,
                created_at: Utc::now(),
            };

            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, serde_json::to_vec(&user)?.as_slice())?;
            index.insert(email, id)?;

            let wallet = StoredWallet::new(id);
            let mut wallets = write_txn.open_table(WALLETS)?;
            wallets.insert(id, serde_json::to_vec(&wallet)?.as_slice())?;

            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Look up a user by id.
    pub fn get(&self, id: u64) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by email via the uniqueness index.
    pub fn get_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USERS_BY_EMAIL)?;
        let id = match index.get(email)? {
            Some(value) => value.value(),
            None => return Ok(None),
        };
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all users, newest first.
    pub fn list_all(&self) -> StoreResult<Vec<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let mut users = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            users.push(serde_json::from_slice(value.value())?);
        }
        users.reverse();
        Ok(users)
    }
}
