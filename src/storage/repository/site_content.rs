// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Site content repository.
//!
//! Editable copy for the public site, keyed by `(page, section)`. Admins
//! upsert entries; the public listing returns everything.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreResult, SITE_CONTENT};

/// Separator between page and section in the table key. US (unit separator)
/// cannot appear in either part.
const KEY_SEPARATOR: char = '\u{1F}';

/// Site content row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredSiteContent {
    pub id: u64,
    pub page: String,
    pub section: String,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for site content.
pub struct SiteContentRepository<'a> {
    db: &'a Database,
}

impl<'a> SiteContentRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn key(page: &str, section: &str) -> String {
        format!("{page}{KEY_SEPARATOR}{section}")
    }

    /// Insert or replace the content for a `(page, section)` pair.
    ///
    /// The row id is assigned on first insert and kept on replacement.
    pub fn upsert(
        &self,
        page: &str,
        section: &str,
        content: &str,
        content_type: &str,
    ) -> StoreResult<StoredSiteContent> {
        let write_txn = self.db.begin_write()?;
        let entry = {
            let key = Self::key(page, section);
            let mut table = write_txn.open_table(SITE_CONTENT)?;
            let existing_id = match table.get(key.as_str())? {
                Some(value) => {
                    let existing: StoredSiteContent = serde_json::from_slice(value.value())?;
                    Some(existing.id)
                }
                None => None,
            };
            let id = match existing_id {
                Some(id) => id,
                None => next_id(&write_txn, "site_content")?,
            };
            let entry = StoredSiteContent {
                id,
                page: page.to_owned(),
                section: section.to_owned(),
                content: content.to_owned(),
                content_type: content_type.to_owned(),
                updated_at: Utc::now(),
            };
            table.insert(key.as_str(), serde_json::to_vec(&entry)?.as_slice())?;
            entry
        };
        write_txn.commit()?;
        Ok(entry)
    }

    /// Fetch one entry.
    pub fn get(&self, page: &str, section: &str) -> StoreResult<Option<StoredSiteContent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SITE_CONTENT)?;
        let key = Self::key(page, section);
        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all entries, ordered by page then section.
    pub fn list_all(&self) -> StoreResult<Vec<StoredSiteContent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SITE_CONTENT)?;

        let mut entries = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            entries.push(serde_json::from_slice(value.value())?);
        }
        Ok(entries)
    }
}
