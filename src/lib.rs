// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! HelpSP - Crowdfunding Platform API Service
//!
//! Single-process REST backend: user accounts with bearer-token auth,
//! funding applications, wallet deposits/withdrawals with commission,
//! reviews, and an admin moderation surface over an embedded store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification, and role extractors
//! - `storage` - Embedded database repositories and the audit log
//! - `config` - Environment variable names and defaults

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
