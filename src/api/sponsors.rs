// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Public sponsor listing.

use axum::{extract::State, Json};

use crate::{error::ApiError, state::AppState, storage::StoredSponsor};

/// List all sponsors. Public.
#[utoipa::path(
    get,
    path = "/api/sponsors",
    tag = "Sponsors",
    responses(
        (status = 200, description = "All sponsors", body = [StoredSponsor]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_sponsors(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredSponsor>>, ApiError> {
    let sponsors = state
        .store
        .sponsors()
        .list_all()
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(sponsors))
}
