// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! # Authentication Module
//!
//! Bearer-token authentication for the HelpSP API.
//!
//! ## Auth Flow
//!
//! 1. Client registers (`POST /api/register`), then logs in
//!    (`POST /api/login`) and receives a signed token
//! 2. Client sends `Authorization: Bearer <token>` on protected routes
//! 3. Server:
//!    - Verifies the HS256 signature against the deployment secret
//!    - Enforces the `exp` claim
//!    - Extracts the principal `{id, email, role}`
//!
//! ## Security
//!
//! - The signing secret comes from deployment configuration; a development
//!   fallback is logged loudly at startup
//! - The principal is trusted for the request lifetime only; role changes
//!   take effect at the next login
//! - Missing credentials reject with 401, failed verification with 403

pub mod claims;
pub mod error;
pub mod extractor;
pub mod roles;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use roles::Role;
pub use token::TokenCodec;
