// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Repository layer providing typed access to the embedded database.
//!
//! Each repository covers one entity and encapsulates its table layout,
//! row encoding, and query patterns.

pub mod applications;
pub mod cards;
pub mod reviews;
pub mod site_content;
pub mod sponsors;
pub mod transactions;
pub mod users;
pub mod wallets;

pub use applications::{
    ApplicationRepository, ApplicationStatus, NewApplication, StoredApplication,
};
pub use cards::{CardRepository, StoredCard};
pub use reviews::{ReviewRepository, ReviewResponse, StoredReview};
pub use site_content::{SiteContentRepository, StoredSiteContent};
pub use sponsors::{SponsorRepository, StoredSponsor};
pub use transactions::{
    StoredTransaction, TransactionRepository, TransactionStatus, TransactionType,
};
pub use users::{StoredUser, UserRepository, UserResponse};
pub use wallets::{StoredWallet, WalletRepository};
