// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Saved card endpoint.
//!
//! Cards are write-once; the profile endpoint returns them.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{audit_log, auth::Auth, error::ApiError, state::AppState, storage::AuditEventType};

use super::MessageResponse;

/// Request to save a payment card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveCardRequest {
    pub card_number: String,
    pub expiry_date: String,
    pub card_holder: String,
}

/// Save a payment card for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/cards",
    tag = "Cards",
    security(("bearer_auth" = [])),
    request_body = SaveCardRequest,
    responses(
        (status = 201, description = "Card added successfully", body = MessageResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_card(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<SaveCardRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let card = state
        .store
        .cards()
        .create(
            user.id,
            &request.card_number,
            &request.expiry_date,
            &request.card_holder,
        )
        .map_err(|err| ApiError::storage("Error adding card", err))?;

    audit_log!(&state.store, AuditEventType::CardSaved, user, "card", card.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Card added successfully".to_string(),
        }),
    ))
}
