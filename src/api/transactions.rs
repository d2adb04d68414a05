// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Wallet transaction endpoints: deposits, withdrawals, and the deposit
//! network lookup.
//!
//! Neither endpoint touches wallet balances. A pending transaction row is
//! recorded and settled manually through the admin balance route.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{AuditEventType, TransactionType},
};

use super::MessageResponse;

// =============================================================================
// Commission & Network Tables
// =============================================================================

/// Network choices offered per deposit currency.
const NETWORK_OPTIONS: &[(&str, &[&str])] = &[
    ("USDT", &["TRON (TRC-20)", "BNB (BEP20)", "MATIC"]),
    ("BTC", &["BTC"]),
    ("ETH", &["ETH"]),
];

/// Fixed deposit address per network. Networks without an entry have no
/// published address.
const DEPOSIT_ADDRESSES: &[(&str, &str)] = &[
    ("TRON (TRC-20)", "TMEsUtqRqoqFQtJiziTq8bBeRT1mXoVyH2"),
    ("BNB (BEP20)", "0x30f7f91409c1f76f398179c7cd9d1e247fcb1785"),
    ("MATIC", "0x30f7f91409c1f76f398179c7cd9d1e247fcb1785"),
    ("BTC", "1EWoJVFHueR8jsYsH4BzYbAzR5FgTvduBT"),
];

/// How a withdrawal is paid out. Anything other than `card` is treated as a
/// crypto withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawMethod {
    Card,
    #[serde(other)]
    Crypto,
}

/// Commission charged for a withdrawal: 3% via card, 1% via crypto.
pub fn commission_for(method: WithdrawMethod, amount: f64) -> f64 {
    match method {
        WithdrawMethod::Card => amount * 0.03,
        WithdrawMethod::Crypto => amount * 0.01,
    }
}

fn deposit_address(network: &str) -> Option<&'static str> {
    DEPOSIT_ADDRESSES
        .iter()
        .find(|(name, _)| *name == network)
        .map(|(_, address)| *address)
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to record a deposit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepositRequest {
    pub currency: String,
    pub network: String,
    pub amount: f64,
}

/// Request to record a withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    pub method: WithdrawMethod,
    pub currency: String,
    /// Network for crypto withdrawals; absent for card payouts.
    #[serde(default)]
    pub network: Option<String>,
    /// Destination address for crypto withdrawals.
    #[serde(default)]
    pub wallet_address: Option<String>,
    pub amount: f64,
}

/// Query parameters for the network lookup.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NetworksQuery {
    /// Deposit currency (USDT, BTC, ETH).
    pub currency: String,
}

/// One deposit network option.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NetworkOption {
    pub network: String,
    /// Deposit address, when one is published for the network.
    pub address: Option<String>,
}

/// Network options for a currency.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NetworksResponse {
    pub currency: String,
    pub networks: Vec<NetworkOption>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Record a deposit.
///
/// Writes a pending transaction with zero commission. The wallet balance is
/// unchanged until an admin settles it.
#[utoipa::path(
    post,
    path = "/api/transactions/deposit",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    request_body = DepositRequest,
    responses(
        (status = 201, description = "Deposit initiated successfully", body = MessageResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn deposit(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let transaction = state
        .store
        .transactions()
        .create(
            user.id,
            TransactionType::Deposit,
            request.amount,
            &request.currency,
            &request.network,
            "",
            0.0,
        )
        .map_err(|err| ApiError::storage("Error processing deposit", err))?;

    audit_log!(
        &state.store,
        AuditEventType::DepositRequested,
        user,
        "transaction",
        transaction.id
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Deposit initiated successfully".to_string(),
        }),
    ))
}

/// Record a withdrawal.
///
/// Commission depends on the payout method: 3% via card, 1% via crypto. As
/// with deposits, only a pending transaction row is written.
#[utoipa::path(
    post,
    path = "/api/transactions/withdraw",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    request_body = WithdrawRequest,
    responses(
        (status = 201, description = "Withdrawal initiated successfully", body = MessageResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn withdraw(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<WithdrawRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let commission = commission_for(request.method, request.amount);

    let transaction = state
        .store
        .transactions()
        .create(
            user.id,
            TransactionType::Withdrawal,
            request.amount,
            &request.currency,
            request.network.as_deref().unwrap_or(""),
            request.wallet_address.as_deref().unwrap_or(""),
            commission,
        )
        .map_err(|err| ApiError::storage("Error processing withdrawal", err))?;

    audit_log!(
        &state.store,
        AuditEventType::WithdrawalRequested,
        user,
        "transaction",
        transaction.id
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Withdrawal initiated successfully".to_string(),
        }),
    ))
}

/// List deposit networks (and addresses) for a currency. Public.
#[utoipa::path(
    get,
    path = "/api/transactions/networks",
    tag = "Transactions",
    params(NetworksQuery),
    responses(
        (status = 200, description = "Network options for the currency", body = NetworksResponse)
    )
)]
pub async fn list_networks(Query(query): Query<NetworksQuery>) -> Json<NetworksResponse> {
    let networks = NETWORK_OPTIONS
        .iter()
        .find(|(currency, _)| *currency == query.currency)
        .map(|(_, networks)| *networks)
        .unwrap_or(&[]);

    let networks = networks
        .iter()
        .map(|network| NetworkOption {
            network: (*network).to_string(),
            address: deposit_address(network).map(str::to_string),
        })
        .collect();

    Json(NetworksResponse {
        currency: query.currency,
        networks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role, TokenCodec};
    use crate::storage::{Store, TransactionStatus};

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let state = AppState::new(store, TokenCodec::new("test-secret", 3600));
        (state, dir)
    }

    fn principal(id: u64) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            email: format!("user{id}@x.com"),
            role: Role::User,
        }
    }

    #[test]
    fn commission_rates_match_the_method() {
        for amount in [0.0, 1.0, 99.99, 5000.0] {
            assert_eq!(commission_for(WithdrawMethod::Card, amount), amount * 0.03);
            assert_eq!(commission_for(WithdrawMethod::Crypto, amount), amount * 0.01);
        }
    }

    #[test]
    fn unknown_withdraw_methods_deserialize_as_crypto() {
        let method: WithdrawMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(method, WithdrawMethod::Card);

        for other in ["\"crypto\"", "\"bank\"", "\"anything\""] {
            let method: WithdrawMethod = serde_json::from_str(other).unwrap();
            assert_eq!(method, WithdrawMethod::Crypto);
        }
    }

    #[tokio::test]
    async fn deposits_record_a_pending_zero_commission_transaction() {
        let (state, _dir) = test_state();

        deposit(
            Auth(principal(1)),
            State(state.clone()),
            Json(DepositRequest {
                currency: "USDT".to_string(),
                network: "TRON (TRC-20)".to_string(),
                amount: 250.0,
            }),
        )
        .await
        .unwrap();

        let transactions = state.store.transactions().list_by_user(1).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction_type, TransactionType::Deposit);
        assert_eq!(transactions[0].status, TransactionStatus::Pending);
        assert_eq!(transactions[0].commission, 0.0);
        assert_eq!(transactions[0].wallet_address, "");
    }

    #[tokio::test]
    async fn withdrawals_record_the_method_commission() {
        let (state, _dir) = test_state();

        withdraw(
            Auth(principal(1)),
            State(state.clone()),
            Json(WithdrawRequest {
                method: WithdrawMethod::Card,
                currency: "USD".to_string(),
                network: None,
                wallet_address: None,
                amount: 100.0,
            }),
        )
        .await
        .unwrap();

        withdraw(
            Auth(principal(1)),
            State(state.clone()),
            Json(WithdrawRequest {
                method: WithdrawMethod::Crypto,
                currency: "USDT".to_string(),
                network: Some("MATIC".to_string()),
                wallet_address: Some("0xabc".to_string()),
                amount: 100.0,
            }),
        )
        .await
        .unwrap();

        let transactions = state.store.transactions().list_by_user(1).unwrap();
        assert_eq!(transactions[0].commission, 100.0 * 0.03);
        assert_eq!(transactions[0].wallet_address, "");
        assert_eq!(transactions[1].commission, 100.0 * 0.01);
        assert_eq!(transactions[1].wallet_address, "0xabc");
    }

    #[tokio::test]
    async fn network_lookup_covers_the_published_table() {
        let Json(usdt) = list_networks(Query(NetworksQuery {
            currency: "USDT".to_string(),
        }))
        .await;
        assert_eq!(usdt.networks.len(), 3);
        assert_eq!(
            usdt.networks[0].address.as_deref(),
            Some("TMEsUtqRqoqFQtJiziTq8bBeRT1mXoVyH2")
        );

        let Json(eth) = list_networks(Query(NetworksQuery {
            currency: "ETH".to_string(),
        }))
        .await;
        assert_eq!(eth.networks.len(), 1);
        assert_eq!(eth.networks[0].address, None);

        let Json(unknown) = list_networks(Query(NetworksQuery {
            currency: "DOGE".to_string(),
        }))
        .await;
        assert!(unknown.networks.is_empty());
    }
}
