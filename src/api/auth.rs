// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Registration and login endpoints.
//!
//! Passwords are bcrypt-hashed before storage. Login issues a signed bearer
//! token carrying the user's id, email, and role.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::Role,
    error::ApiError,
    state::AppState,
    storage::{AuditEvent, AuditEventType},
};

use super::MessageResponse;

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Recovery phrase chosen by the user at signup.
    #[serde(rename = "secretKey")]
    pub secret_key: String,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Register a new user account.
///
/// Creates the User row and its zero-balance Wallet in one storage
/// transaction.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Invalid input or email already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email is required"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        ApiError::internal("Error creating user")
    })?;

    let user = state
        .store
        .users()
        .create(email, &password_hash, &request.secret_key, Role::User)
        .map_err(|err| ApiError::storage("Error creating user", err))?;

    audit_log!(&state.store, AuditEventType::UserRegistered, user);
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Log in with email and password.
///
/// Returns a bearer token on success. Both unknown-email and wrong-password
/// failures are 401.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let maybe_user = state
        .store
        .users()
        .get_by_email(&request.email)
        .map_err(|err| ApiError::storage("Database error", err))?;

    let user = match maybe_user {
        Some(user) => user,
        None => {
            log_login_failure(&state, &request.email, "User not found");
            return Err(ApiError::unauthorized("User not found"));
        }
    };

    let password_ok = bcrypt::verify(&request.password, &user.password_hash).map_err(|err| {
        tracing::error!(error = %err, "password verification failed");
        ApiError::internal("Authentication error")
    })?;
    if !password_ok {
        log_login_failure(&state, &request.email, "Invalid password");
        return Err(ApiError::unauthorized("Invalid password"));
    }

    let token = state
        .tokens
        .issue(user.id, &user.email, user.role)
        .map_err(|err| {
            tracing::error!(error = %err, "token issuance failed");
            ApiError::internal("Authentication error")
        })?;

    audit_log!(&state.store, AuditEventType::LoginSuccess, user);
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse { token }))
}

fn log_login_failure(state: &AppState, email: &str, reason: &str) {
    let event = AuditEvent::new(AuditEventType::LoginFailure)
        .with_details(serde_json::json!({ "email": email }))
        .failed(reason);
    if let Err(err) = state.store.audit().log(&event) {
        tracing::warn!(error = %err, "failed to write audit event");
    }
    tracing::warn!(email, reason, "login failed");
}
