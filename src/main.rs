// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use helpsp_server::api::router;
use helpsp_server::auth::{Role, TokenCodec};
use helpsp_server::config;
use helpsp_server::state::AppState;
use helpsp_server::storage::Store;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_dir: PathBuf = env::var(config::DATA_DIR_ENV)
        .unwrap_or_else(|_| config::DEFAULT_DATA_DIR.to_string())
        .into();

    let secret = env::var(config::JWT_SECRET_ENV).unwrap_or_else(|_| {
        warn!(
            "{} is not set; falling back to the development signing secret",
            config::JWT_SECRET_ENV
        );
        config::DEV_JWT_SECRET.to_string()
    });

    let ttl_secs: u64 = env::var(config::TOKEN_TTL_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(config::DEFAULT_TOKEN_TTL_SECS);

    let store = Store::open(&data_dir).expect("Failed to open database");
    info!(data_dir = %data_dir.display(), "database open");

    match store.seed_initial_content() {
        Ok(true) => info!("seeded first-run sponsors and site content"),
        Ok(false) => {}
        Err(err) => warn!(error = %err, "first-run seeding failed"),
    }

    bootstrap_admin(&store);

    let state = AppState::new(store, TokenCodec::new(&secret, ttl_secs));
    let app = router(state);

    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| config::DEFAULT_HOST.to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(config::DEFAULT_PORT);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    info!(%addr, "HelpSP server listening (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_for_shutdown(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .expect("server failed");

    info!("shutdown complete");
}

/// Create the admin account named by the environment, if it is missing.
///
/// Runs at every startup and is idempotent; an existing account with the
/// same email is left untouched.
fn bootstrap_admin(store: &Store) {
    let (Ok(email), Ok(password)) = (
        env::var(config::SEED_ADMIN_EMAIL_ENV),
        env::var(config::SEED_ADMIN_PASSWORD_ENV),
    ) else {
        return;
    };
    let secret_key = env::var(config::SEED_ADMIN_SECRET_ENV).unwrap_or_default();

    match store.users().get_by_email(&email) {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "admin bootstrap lookup failed");
            return;
        }
    }

    let hash = match bcrypt::hash(&password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            warn!(error = %err, "admin bootstrap hash failed");
            return;
        }
    };

    match store.users().create(&email, &hash, &secret_key, Role::Admin) {
        Ok(user) => info!(user_id = user.id, "bootstrap admin created"),
        Err(err) => warn!(error = %err, "admin bootstrap failed"),
    }
}

/// Cancel the token when SIGINT or SIGTERM arrives.
async fn watch_for_shutdown(shutdown: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("SIGINT received, shutting down"),
            _ = sigterm.recv() => info!("SIGTERM received, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("SIGINT received, shutting down");
    }

    shutdown.cancel();
}
