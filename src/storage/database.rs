// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Embedded application database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: email → user_id (uniqueness index)
//! - `wallets`: user_id → serialized StoredWallet
//! - `applications`: application_id → serialized StoredApplication
//! - `reviews`: review_id → serialized StoredReview
//! - `cards`: card_id → serialized StoredCard
//! - `transactions`: transaction_id → serialized StoredTransaction
//! - `site_content`: composite key (page, section) → serialized StoredSiteContent
//! - `sponsors`: sponsor_id → serialized StoredSponsor
//! - `sequences`: sequence name → last issued id

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};

use super::audit::AuditRepository;
use super::repository::{
    ApplicationRepository, CardRepository, ReviewRepository, SiteContentRepository,
    SponsorRepository, TransactionRepository, UserRepository, WalletRepository,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary user table: user_id → serialized StoredUser (JSON bytes).
pub(super) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Uniqueness index: email → user_id.
pub(super) const USERS_BY_EMAIL: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_email");

/// Wallets, one per user: user_id → serialized StoredWallet.
pub(super) const WALLETS: TableDefinition<u64, &[u8]> = TableDefinition::new("wallets");

/// Funding applications: application_id → serialized StoredApplication.
pub(super) const APPLICATIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("applications");

/// Reviews: review_id → serialized StoredReview.
pub(super) const REVIEWS: TableDefinition<u64, &[u8]> = TableDefinition::new("reviews");

/// Payment cards: card_id → serialized StoredCard.
pub(super) const CARDS: TableDefinition<u64, &[u8]> = TableDefinition::new("cards");

/// Wallet transactions: transaction_id → serialized StoredTransaction.
pub(super) const TRANSACTIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("transactions");

/// Site content: composite key (page, section) → serialized StoredSiteContent.
/// Key format: `page \x1F section` (unit separator never appears in page names).
pub(super) const SITE_CONTENT: TableDefinition<&str, &[u8]> = TableDefinition::new("site_content");

/// Sponsors: sponsor_id → serialized StoredSponsor.
pub(super) const SPONSORS: TableDefinition<u64, &[u8]> = TableDefinition::new("sponsors");

/// Auto-increment state: sequence name → last issued id.
pub(super) const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Database file name inside the data directory.
const DB_FILE: &str = "helpsp.redb";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("email already registered")]
    EmailTaken,

    #[error("row not found in {0}")]
    RowNotFound(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Id Sequences
// =============================================================================

/// Issue the next id for `sequence` within an open write transaction.
///
/// Ids are monotonic per entity, starting at 1, so ascending key order is
/// insertion order.
pub(super) fn next_id(txn: &WriteTransaction, sequence: &str) -> StoreResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle over the embedded database and the audit log.
///
/// Cheap to clone; all clones refer to the same underlying database.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
    audit: Arc<AuditRepository>,
}

impl Store {
    /// Open (or create) the database under the given data directory.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        let db = Database::create(dir.join(DB_FILE))?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(APPLICATIONS)?;
            let _ = write_txn.open_table(REVIEWS)?;
            let _ = write_txn.open_table(CARDS)?;
            let _ = write_txn.open_table(TRANSACTIONS)?;
            let _ = write_txn.open_table(SITE_CONTENT)?;
            let _ = write_txn.open_table(SPONSORS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            audit: Arc::new(AuditRepository::new(dir.join("audit"))),
        })
    }

    pub(super) fn db(&self) -> &Database {
        &self.db
    }

    /// Audit log for this store's data directory.
    pub fn audit(&self) -> &AuditRepository {
        &self.audit
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.db)
    }

    pub fn wallets(&self) -> WalletRepository<'_> {
        WalletRepository::new(&self.db)
    }

    pub fn applications(&self) -> ApplicationRepository<'_> {
        ApplicationRepository::new(&self.db)
    }

    pub fn reviews(&self) -> ReviewRepository<'_> {
        ReviewRepository::new(&self.db)
    }

    pub fn cards(&self) -> CardRepository<'_> {
        CardRepository::new(&self.db)
    }

    pub fn transactions(&self) -> TransactionRepository<'_> {
        TransactionRepository::new(&self.db)
    }

    pub fn site_content(&self) -> SiteContentRepository<'_> {
        SiteContentRepository::new(&self.db)
    }

    pub fn sponsors(&self) -> SponsorRepository<'_> {
        SponsorRepository::new(&self.db)
    }

    /// Insert the first-run sponsor and site-content rows.
    ///
    /// Idempotent: rows are only written when the sponsor table is empty.
    /// Returns `true` when seeding ran.
    pub fn seed_initial_content(&self) -> StoreResult<bool> {
        if self.sponsors().count()? > 0 {
            return Ok(false);
        }

        self.sponsors().create(
            "TechVentures Capital",
            "A leading venture capital firm focused on early-stage technology startups.",
            "Company",
            45,
            2_500_000.0,
        )?;
        self.sponsors().create(
            "Green Innovation Fund",
            "Dedicated to funding sustainable and eco-friendly startups.",
            "Organization",
            32,
            1_800_000.0,
        )?;
        self.sponsors().create(
            "Sarah Johnson",
            "Angel investor with 15 years of experience in supporting early-stage startups.",
            "Individual",
            28,
            900_000.0,
        )?;

        self.site_content()
            .upsert("home", "hero", "Fund Your Startup Dreams", "text")?;
        self.site_content().upsert(
            "about",
            "mission",
            "Empowering entrepreneurs and innovators to bring their ideas to life.",
            "text",
        )?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let _store = Store::open(dir.path()).unwrap();
        assert!(dir.path().join(DB_FILE).exists());
    }

    #[test]
    fn sequences_are_monotonic_per_entity() {
        let (store, _dir) = temp_store();
        let txn = store.db().begin_write().unwrap();
        assert_eq!(next_id(&txn, "users").unwrap(), 1);
        assert_eq!(next_id(&txn, "users").unwrap(), 2);
        assert_eq!(next_id(&txn, "reviews").unwrap(), 1);
        txn.commit().unwrap();

        let txn = store.db().begin_write().unwrap();
        assert_eq!(next_id(&txn, "users").unwrap(), 3);
        txn.commit().unwrap();
    }

    #[test]
    fn seed_initial_content_runs_once() {
        let (store, _dir) = temp_store();
        assert!(store.seed_initial_content().unwrap());
        assert!(!store.seed_initial_content().unwrap());

        assert_eq!(store.sponsors().count().unwrap(), 3);
        assert_eq!(store.site_content().list_all().unwrap().len(), 2);
    }
}
