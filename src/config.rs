// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the database and audit logs | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | dev fallback (logged warning) |
//! | `TOKEN_TTL_SECS` | Token lifetime in seconds | `604800` (7 days) |
//! | `SEED_ADMIN_EMAIL` | Bootstrap admin account email | unset (no bootstrap) |
//! | `SEED_ADMIN_PASSWORD` | Bootstrap admin account password | unset |
//! | `SEED_ADMIN_SECRET` | Bootstrap admin secret key | empty string |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable name for the data directory path.
///
/// The database file and the audit log directory live here. Created at
/// startup when missing.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Default bind address when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Default bind port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable name for the token signing secret.
///
/// Every deployment must set this. When unset the service falls back to a
/// well-known development secret and logs a warning at startup.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Development fallback signing secret. Not for production use.
pub const DEV_JWT_SECRET: &str = "helpsp-secret-key";

/// Environment variable name for the token lifetime in seconds.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Environment variable name for the bootstrap admin email.
///
/// When set together with [`SEED_ADMIN_PASSWORD_ENV`] and no account with
/// that email exists yet, an admin user is created at startup.
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";

/// Environment variable name for the bootstrap admin password.
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// Environment variable name for the bootstrap admin secret key.
pub const SEED_ADMIN_SECRET_ENV: &str = "SEED_ADMIN_SECRET";
