// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Review endpoints.
//!
//! Any authenticated user can leave a review; the listing is public and
//! carries the reviewer's email. Moderation lives under the admin routes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{AuditEventType, ReviewResponse},
};

use super::MessageResponse;

/// Request to submit a review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    /// Star rating from 1 to 5.
    pub rating: i32,
    pub comment: String,
}

/// Submit a review.
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review submitted successfully", body = MessageResponse),
        (status = 400, description = "Rating out of range"),
        (status = 401, description = "Missing bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_review(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if !(1..=5).contains(&request.rating) {
        return Err(ApiError::bad_request("Rating must be between 1 and 5"));
    }

    let review = state
        .store
        .reviews()
        .create(user.id, request.rating, &request.comment)
        .map_err(|err| ApiError::storage("Error submitting review", err))?;

    audit_log!(
        &state.store,
        AuditEventType::ReviewSubmitted,
        user,
        "review",
        review.id
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Review submitted successfully".to_string(),
        }),
    ))
}

/// List all reviews with reviewer emails, newest first. Public.
#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "Reviews, newest first", body = [ReviewResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = state
        .store
        .reviews()
        .list_with_reviewer_email()
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(reviews))
}
