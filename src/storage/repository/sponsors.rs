// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Sponsor repository.
//!
//! Sponsors are the showcase entries on the public site. They are seeded on
//! first run and read-only through the API.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreResult, SPONSORS};

/// Sponsor row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredSponsor {
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub sponsor_type: String,
    pub approved_applications: u32,
    pub total_funded: f64,
    pub created_at: DateTime<Utc>,
}

/// Repository for sponsors.
pub struct SponsorRepository<'a> {
    db: &'a Database,
}

impl<'a> SponsorRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Add a sponsor.
    pub fn create(
        &self,
        name: &str,
        description: &str,
        sponsor_type: &str,
        approved_applications: u32,
        total_funded: f64,
    ) -> StoreResult<StoredSponsor> {
        let write_txn = self.db.begin_write()?;
        let sponsor = {
            let id = next_id(&write_txn, "sponsors")?;
            let sponsor = StoredSponsor {
                id,
                name: name.to_owned(),
                description: description.to_owned(),
                sponsor_type: sponsor_type.to_owned(),
                approved_applications,
                total_funded,
                created_at: Utc::now(),
            };
            let mut table = write_txn.open_table(SPONSORS)?;
            table.insert(id, serde_json::to_vec(&sponsor)?.as_slice())?;
            sponsor
        };
        write_txn.commit()?;
        Ok(sponsor)
    }

    /// List all sponsors in insertion order.
    pub fn list_all(&self) -> StoreResult<Vec<StoredSponsor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPONSORS)?;

        let mut sponsors = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            sponsors.push(serde_json::from_slice(value.value())?);
        }
        Ok(sponsors)
    }

    /// Number of sponsor rows.
    pub fn count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPONSORS)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;

    fn temp_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn create_and_list_round_trips() {
        let (store, _dir) = temp_store();
        store
            .sponsors()
            .create("Acme Fund", "Backs hardware startups.", "Company", 12, 340_000.0)
            .unwrap();

        let sponsors = store.sponsors().list_all().unwrap();
        assert_eq!(sponsors.len(), 1);
        assert_eq!(sponsors[0].name, "Acme Fund");
        assert_eq!(sponsors[0].approved_applications, 12);
        assert_eq!(sponsors[0].total_funded, 340_000.0);
    }

    #[test]
    fn count_tracks_inserts() {
        let (store, _dir) = temp_store();
        assert_eq!(store.sponsors().count().unwrap(), 0);

        store.sponsors().create("A", "", "Individual", 0, 0.0).unwrap();
        store.sponsors().create("B", "", "Company", 0, 0.0).unwrap();

        assert_eq!(store.sponsors().count().unwrap(), 2);
    }

    #[test]
    fn type_field_serializes_under_its_wire_name() {
        let (store, _dir) = temp_store();
        let sponsor = store
            .sponsors()
            .create("Acme Fund", "", "Organization", 0, 0.0)
            .unwrap();

        let value = serde_json::to_value(&sponsor).unwrap();
        assert_eq!(value["type"], "Organization");
        assert!(value.get("sponsor_type").is_none());
    }
}
