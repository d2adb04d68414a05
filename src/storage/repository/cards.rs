// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Saved payment card repository.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreResult, CARDS};

/// Saved card row. Returned verbatim in the profile payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredCard {
    pub id: u64,
    pub user_id: u64,
    pub card_number: String,
    pub expiry_date: String,
    pub card_holder: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for saved cards.
pub struct CardRepository<'a> {
    db: &'a Database,
}

impl<'a> CardRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Save a card for a user.
    pub fn create(
        &self,
        user_id: u64,
        card_number: &str,
        expiry_date: &str,
        card_holder: &str,
    ) -> StoreResult<StoredCard> {
        let write_txn = self.db.begin_write()?;
        let card = {
            let id = next_id(&write_txn, "cards")?;
            let card = StoredCard {
                id,
                user_id,
                card_number: card_number.to_owned(),
                expiry_date: expiry_date.to_owned(),
                card_holder: card_holder.to_owned(),
                created_at: Utc::now(),
            };
            let mut table = write_txn.open_table(CARDS)?;
            table.insert(id, serde_json::to_vec(&card)?.as_slice())?;
            card
        };
        write_txn.commit()?;
        Ok(card)
    }

    /// List a user's saved cards in insertion order.
    pub fn list_by_user(&self, user_id: u64) -> StoreResult<Vec<StoredCard>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CARDS)?;

        let mut cards = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let card: StoredCard = serde_json::from_slice(value.value())?;
            if card.user_id == user_id {
                cards.push(card);
            }
        }
        Ok(cards)
    }
}
