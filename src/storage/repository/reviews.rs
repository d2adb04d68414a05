// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Review repository.
//!
//! Reviews are created by users and only edited or deleted by admins. The
//! public listing joins each review with its reviewer's email.

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, StoreResult, REVIEWS, USERS};
use super::users::StoredUser;

/// Review row as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReview {
    pub id: u64,
    pub user_id: u64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review as listed by the API, with the reviewer's email joined in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: u64,
    pub user_id: u64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user_email: Option<String>,
}

impl ReviewResponse {
    fn from_row(review: StoredReview, user_email: Option<String>) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            user_email,
        }
    }
}

/// Repository for reviews.
pub struct ReviewRepository<'a> {
    db: &'a Database,
}

impl<'a> ReviewRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a review for a user.
    pub fn create(&self, user_id: u64, rating: i32, comment: &str) -> StoreResult<StoredReview> {
        let write_txn = self.db.begin_write()?;
        let review = {
            let id = next_id(&write_txn, "reviews")?;
            let review = StoredReview {
                id,
                user_id,
                rating,
                comment: comment.to_owned(),
                created_at: Utc::now(),
            };
            let mut table = write_txn.open_table(REVIEWS)?;
            table.insert(id, serde_json::to_vec(&review)?.as_slice())?;
            review
        };
        write_txn.commit()?;
        Ok(review)
    }

    /// List all reviews with reviewer emails, newest first.
    ///
    /// A review whose user row is gone keeps a null email, mirroring an
    /// outer join.
    pub fn list_with_reviewer_email(&self) -> StoreResult<Vec<ReviewResponse>> {
        let read_txn = self.db.begin_read()?;
        let reviews_table = read_txn.open_table(REVIEWS)?;
        let users_table = read_txn.open_table(USERS)?;

        let mut reviews = Vec::new();
        for entry in reviews_table.iter()? {
            let (_, value) = entry?;
            let review: StoredReview = serde_json::from_slice(value.value())?;
            let user_email = match users_table.get(review.user_id)? {
                Some(user_bytes) => {
                    let user: StoredUser = serde_json::from_slice(user_bytes.value())?;
                    Some(user.email)
                }
                None => None,
            };
            reviews.push(ReviewResponse::from_row(review, user_email));
        }
        reviews.reverse();
        Ok(reviews)
    }

    /// Overwrite a review's rating and comment.
    ///
    /// Returns `false` when no such review exists.
    pub fn update(&self, id: u64, rating: i32, comment: &str) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(REVIEWS)?;
            let existing = match table.get(id)? {
                Some(value) => {
                    let review: StoredReview = serde_json::from_slice(value.value())?;
                    Some(review)
                }
                None => None,
            };
            match existing {
                Some(mut review) => {
                    review.rating = rating;
                    review.comment = comment.to_owned();
                    table.insert(id, serde_json::to_vec(&review)?.as_slice())?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a review. Returns `false` when no such review exists.
    pub fn delete(&self, id: u64) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(REVIEWS)?;
            // Bind the access guard so it drops before the table does
            let previous = table.remove(id)?;
            previous.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
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
    fn create_and_list_joins_reviewer_email() {
        let (store, _dir) = temp_store();
        let user = store
            .users()
            .create("alice@x.com", "hash", "s", Role::User)
            .unwrap();
        store.reviews().create(user.id, 5, "Great platform").unwrap();

        let reviews = store.reviews().list_with_reviewer_email().unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].user_email.as_deref(), Some("alice@x.com"));
    }

    #[test]
    fn listing_is_newest_first() {
        let (store, _dir) = temp_store();
        let user = store
            .users()
            .create("a@x.com", "hash", "s", Role::User)
            .unwrap();
        store.reviews().create(user.id, 1, "first").unwrap();
        store.reviews().create(user.id, 2, "second").unwrap();

        let reviews = store.reviews().list_with_reviewer_email().unwrap();
        assert_eq!(reviews[0].comment, "second");
        assert_eq!(reviews[1].comment, "first");
    }

    #[test]
    fn missing_reviewer_keeps_null_email() {
        let (store, _dir) = temp_store();
        store.reviews().create(999, 3, "orphaned").unwrap();

        let reviews = store.reviews().list_with_reviewer_email().unwrap();
        assert_eq!(reviews[0].user_email, None);
    }

    #[test]
    fn update_overwrites_rating_and_comment() {
        let (store, _dir) = temp_store();
        let review = store.reviews().create(1, 2, "meh").unwrap();

        assert!(store.reviews().update(review.id, 4, "better").unwrap());

        let reviews = store.reviews().list_with_reviewer_email().unwrap();
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(reviews[0].comment, "better");
    }

    #[test]
    fn update_and_delete_on_missing_rows_are_noops() {
        let (store, _dir) = temp_store();
        assert!(!store.reviews().update(42, 5, "ghost").unwrap());
        assert!(!store.reviews().delete(42).unwrap());
    }

    #[test]
    fn delete_removes_the_row() {
        let (store, _dir) = temp_store();
        let review = store.reviews().create(1, 5, "bye").unwrap();

        assert!(store.reviews().delete(review.id).unwrap());
        assert!(store.reviews().list_with_reviewer_email().unwrap().is_empty());
    }
}
