// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Funding application repository.
//!
//! Applications are created by users with status `pending` and moderated by
//! admins through status transitions to `approved` or `rejected`.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreResult, APPLICATIONS};

/// Moderation status of a funding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Submitted, awaiting admin review
    Pending,
    /// Approved by an admin
    Approved,
    /// Rejected by an admin
    Rejected,
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Fields supplied by the applicant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewApplication {
    pub project_name: String,
    pub project_type: String,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub amount: f64,
}

/// Application row. Exposed directly by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredApplication {
    pub id: u64,
    pub user_id: u64,
    pub project_name: String,
    pub project_type: String,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub amount: f64,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Repository for funding applications.
pub struct ApplicationRepository<'a> {
    db: &'a Database,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an application for a user. Status starts at `pending`.
    pub fn create(&self, user_id: u64, new: NewApplication) -> StoreResult<StoredApplication> {
        let write_txn = self.db.begin_write()?;
        let application = {
            let id = next_id(&write_txn, "applications")?;
            let application = StoredApplication {
                id,
                user_id,
                project_name: new.project_name,
                project_type: new.project_type,
                description: new.description,
                first_name: new.first_name,
                last_name: new.last_name,
                email: new.email,
                phone: new.phone,
                amount: new.amount,
                status: ApplicationStatus::Pending,
                created_at: Utc::now(),
            };
            let mut table = write_txn.open_table(APPLICATIONS)?;
            table.insert(id, serde_json::to_vec(&application)?.as_slice())?;
            application
        };
        write_txn.commit()?;
        Ok(application)
    }

    /// List one user's applications, newest first.
    pub fn list_by_user(&self, user_id: u64) -> StoreResult<Vec<StoredApplication>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(APPLICATIONS)?;
        let mut applications = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let application: StoredApplication = serde_json::from_slice(value.value())?;
            if application.user_id == user_id {
                applications.push(application);
            }
        }
        applications.reverse();
        Ok(applications)
    }

    /// List all applications, newest first (admin view).
    pub fn list_all(&self) -> StoreResult<Vec<StoredApplication>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(APPLICATIONS)?;
        let mut applications = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            applications.push(serde_json::from_slice(value.value())?);
        }
        applications.reverse();
        Ok(applications)
    }

    /// Set the moderation status of an application.
    ///
    /// Returns `false` when no such application exists.
    pub fn set_status(&self, id: u64, status: ApplicationStatus) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(APPLICATIONS)?;
            let existing = match table.get(id)? {
                Some(value) => {
                    let application: StoredApplication = serde_json::from_slice(value.value())?;
                    Some(application)
                }
                None => None,
            };
            match existing {
                Some(mut application) => {
                    application.status = status;
                    table.insert(id, serde_json::to_vec(&application)?.as_slice())?;
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
    use crate::storage::Store;

    fn temp_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    fn sample_application(project: &str) -> NewApplication {
        NewApplication {
            project_name: project.to_string(),
            project_type: "startup".to_string(),
            description: "A project".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@x.com".to_string(),
            phone: "+100000000".to_string(),
            amount: 5000.0,
        }
    }

    #[test]
    fn create_starts_pending() {
        let (store, _dir) = temp_store();
        let application = store
            .applications()
            .create(1, sample_application("Rocket"))
            .unwrap();

        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.user_id, 1);
        assert_eq!(application.project_name, "Rocket");
    }

    #[test]
    fn list_by_user_scopes_to_owner() {
        let (store, _dir) = temp_store();
        store
            .applications()
            .create(1, sample_application("Owned"))
            .unwrap();
        store
            .applications()
            .create(2, sample_application("Foreign"))
            .unwrap();

        let mine = store.applications().list_by_user(1).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].project_name, "Owned");
    }

    #[test]
    fn lists_are_newest_first() {
        let (store, _dir) = temp_store();
        for name in ["first", "second", "third"] {
            store
                .applications()
                .create(1, sample_application(name))
                .unwrap();
        }

        let all = store.applications().list_all().unwrap();
        let names: Vec<&str> = all.iter().map(|a| a.project_name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);

        let mine = store.applications().list_by_user(1).unwrap();
        assert_eq!(mine[0].project_name, "third");
    }

    #[test]
    fn set_status_updates_only_status() {
        let (store, _dir) = temp_store();
        let created = store
            .applications()
            .create(1, sample_application("Rocket"))
            .unwrap();

        let updated = store
            .applications()
            .set_status(created.id, ApplicationStatus::Approved)
            .unwrap();
        assert!(updated);

        let listed = store.applications().list_by_user(1).unwrap();
        assert_eq!(listed[0].status, ApplicationStatus::Approved);
        assert_eq!(listed[0].project_name, "Rocket");
        assert_eq!(listed[0].amount, 5000.0);
        assert_eq!(listed[0].created_at, created.created_at);
    }

    #[test]
    fn set_status_on_missing_row_is_a_noop() {
        let (store, _dir) = temp_store();
        let updated = store
            .applications()
            .set_status(42, ApplicationStatus::Rejected)
            .unwrap();
        assert!(!updated);
    }
}
