// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! # Storage Module
//!
//! Persistence for the platform, backed by an embedded [redb] database plus
//! an append-only audit log on the plain filesystem.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   helpsp.redb          # All tables (users, wallets, applications, ...)
//!   audit/
//!     {date}.jsonl       # Daily audit logs
//! ```
//!
//! ## Important Notes
//!
//! - Rows are stored as JSON values under monotonically increasing u64 ids
//! - Each id sequence is per entity and never reused
//! - Multi-row operations (such as registration) commit in one transaction
//! - Password hashes and secret keys never leave this module in API types

pub mod audit;
pub mod database;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use database::{Store, StoreError, StoreResult};
pub use repository::{
    ApplicationRepository, ApplicationStatus, CardRepository, NewApplication, ReviewRepository,
    ReviewResponse, SiteContentRepository, SponsorRepository, StoredApplication, StoredCard,
    StoredSiteContent, StoredSponsor, StoredTransaction, StoredUser, StoredWallet,
    TransactionRepository, TransactionStatus, TransactionType, UserRepository, UserResponse,
    WalletRepository,
};
