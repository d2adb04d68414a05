// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Public site content listing. Editing happens through the admin routes.

use axum::{extract::State, Json};

use crate::{error::ApiError, state::AppState, storage::StoredSiteContent};

/// List all site content entries. Public.
#[utoipa::path(
    get,
    path = "/api/site-content",
    tag = "SiteContent",
    responses(
        (status = 200, description = "All site content entries", body = [StoredSiteContent]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_site_content(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredSiteContent>>, ApiError> {
    let entries = state
        .store
        .site_content()
        .list_all()
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(entries))
}
