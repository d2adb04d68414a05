// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Profile endpoint: the authenticated user's account, wallet, transaction
//! history, and saved cards in one payload.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{StoredCard, StoredTransaction, StoredWallet, UserResponse},
};

/// Aggregated profile payload.
///
/// The user part is a safe projection; password hashes and secret keys are
/// never serialized.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub wallet: StoredWallet,
    pub transactions: Vec<StoredTransaction>,
    pub cards: Vec<StoredCard>,
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile payload", body = ProfileResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let stored_user = state
        .store
        .users()
        .get(user.id)
        .map_err(|err| ApiError::storage("Database error", err))?
        .ok_or_else(|| {
            tracing::error!(user_id = user.id, "user row missing for valid token");
            ApiError::internal("Database error")
        })?;

    let wallet = state
        .store
        .wallets()
        .get(user.id)
        .map_err(|err| ApiError::storage("Database error", err))?
        .ok_or_else(|| {
            tracing::error!(user_id = user.id, "wallet row missing for existing user");
            ApiError::internal("Database error")
        })?;

    let transactions = state
        .store
        .transactions()
        .list_by_user(user.id)
        .map_err(|err| ApiError::storage("Database error", err))?;

    let cards = state
        .store
        .cards()
        .list_by_user(user.id)
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(ProfileResponse {
        user: stored_user.into(),
        wallet,
        transactions,
        cards,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role, TokenCodec};
    use crate::storage::{Store, TransactionType};

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let state = AppState::new(store, TokenCodec::new("test-secret", 3600));
        (state, dir)
    }

    #[tokio::test]
    async fn fresh_accounts_have_empty_wallet_and_history() {
        let (state, _dir) = test_state();
        let user = state
            .store
            .users()
            .create("alice@x.com", "hash", "secret1", Role::User)
            .unwrap();

        let Json(profile) = get_profile(
            Auth(AuthenticatedUser {
                id: user.id,
                email: user.email.clone(),
                role: Role::User,
            }),
            State(state),
        )
        .await
        .unwrap();

        assert_eq!(profile.user.email, "alice@x.com");
        assert_eq!(profile.user.role, Role::User);
        assert_eq!(profile.wallet.personal_balance, 0.0);
        assert_eq!(profile.wallet.sponsor_balance, 0.0);
        assert!(profile.transactions.is_empty());
        assert!(profile.cards.is_empty());
    }

    #[tokio::test]
    async fn profile_includes_transactions_and_cards() {
        let (state, _dir) = test_state();
        let user = state
            .store
            .users()
            .create("bob@x.com", "hash", "s", Role::User)
            .unwrap();
        state
            .store
            .transactions()
            .create(user.id, TransactionType::Deposit, 10.0, "BTC", "BTC", "", 0.0)
            .unwrap();
        state
            .store
            .cards()
            .create(user.id, "4242", "12/27", "BOB")
            .unwrap();

        let Json(profile) = get_profile(
            Auth(AuthenticatedUser {
                id: user.id,
                email: user.email.clone(),
                role: Role::User,
            }),
            State(state),
        )
        .await
        .unwrap();

        assert_eq!(profile.transactions.len(), 1);
        assert_eq!(profile.cards.len(), 1);
    }

    #[tokio::test]
    async fn serialized_profile_never_leaks_credentials() {
        let (state, _dir) = test_state();
        let user = state
            .store
            .users()
            .create("carol@x.com", "hash", "top-secret", Role::User)
            .unwrap();

        let Json(profile) = get_profile(
            Auth(AuthenticatedUser {
                id: user.id,
                email: user.email.clone(),
                role: Role::User,
            }),
            State(state),
        )
        .await
        .unwrap();

        let value = serde_json::to_value(&profile).unwrap();
        let rendered = value.to_string();
        assert!(!rendered.contains("password_hash"));
        assert!(!rendered.contains("secret_key"));
        assert!(!rendered.contains("top-secret"));
    }
}
