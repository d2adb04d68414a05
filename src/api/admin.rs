// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Admin-only API endpoints for moderation and settlement.
//!
//! These endpoints require the Admin role and provide:
//! - Application review (status transitions)
//! - Review moderation (edit/delete)
//! - User overview and manual balance settlement
//! - Site content editing
//!
//! Updates and deletes that match no row still return 200 with the usual
//! message; the admin UI treats both the same.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::{AdminOnly, Role},
    error::ApiError,
    state::AppState,
    storage::{
        ApplicationStatus, AuditEvent, AuditEventType, ReviewResponse, StoredApplication,
        StoredSiteContent,
    },
};

use super::MessageResponse;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to change an application's status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}

/// Request to edit a review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    /// Star rating from 1 to 5.
    pub rating: i32,
    pub comment: String,
}

/// Request to overwrite a user's wallet balances.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateBalanceRequest {
    pub personal_balance: f64,
    pub sponsor_balance: f64,
}

/// Request to upsert a site content entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSiteContentRequest {
    pub page: String,
    pub section: String,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// User row in the admin overview, with wallet balances joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminUserResponse {
    pub id: u64,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Absent when the user has no wallet row.
    pub personal_balance: Option<f64>,
    pub sponsor_balance: Option<f64>,
}

// ============================================================================
// Applications
// ============================================================================

/// List every application, newest first. Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/applications",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All applications", body = [StoredApplication]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn list_all_applications(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredApplication>>, ApiError> {
    let applications = state
        .store
        .applications()
        .list_all()
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(applications))
}

/// Set an application's status. Admin only.
#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Application updated successfully", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_application_status(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .applications()
        .set_status(id, request.status)
        .map_err(|err| ApiError::storage("Error updating application", err))?;

    let event = AuditEvent::new(AuditEventType::ApplicationStatusChanged)
        .with_user(admin.id)
        .with_resource("application", id)
        .with_details(serde_json::json!({ "status": request.status }));
    if let Err(err) = state.store.audit().log(&event) {
        tracing::warn!(error = %err, "failed to write audit event");
    }
    tracing::info!(application_id = id, status = ?request.status, "application status changed");

    Ok(Json(MessageResponse {
        message: "Application updated successfully".to_string(),
    }))
}

// ============================================================================
// Users & Balances
// ============================================================================

/// List every user with wallet balances, newest first. Admin only.
///
/// A safe projection: password hashes and secret keys are never included.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users with balances", body = [AdminUserResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminUserResponse>>, ApiError> {
    let users = state
        .store
        .users()
        .list_all()
        .map_err(|err| ApiError::storage("Database error", err))?;

    let mut rows = Vec::with_capacity(users.len());
    for user in users {
        let wallet = state
            .store
            .wallets()
            .get(user.id)
            .map_err(|err| ApiError::storage("Database error", err))?;
        rows.push(AdminUserResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            personal_balance: wallet.as_ref().map(|w| w.personal_balance),
            sponsor_balance: wallet.as_ref().map(|w| w.sponsor_balance),
        });
    }

    Ok(Json(rows))
}

/// Overwrite a user's wallet balances. Admin only.
///
/// This is the settlement path for pending deposits and withdrawals.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/balance",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateBalanceRequest,
    responses(
        (status = 200, description = "Balance updated successfully", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_user_balance(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateBalanceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .wallets()
        .set_balances(id, request.personal_balance, request.sponsor_balance)
        .map_err(|err| ApiError::storage("Error updating balance", err))?;

    let event = AuditEvent::new(AuditEventType::BalanceOverridden)
        .with_user(admin.id)
        .with_resource("user", id)
        .with_details(serde_json::json!({
            "personal_balance": request.personal_balance,
            "sponsor_balance": request.sponsor_balance,
        }));
    if let Err(err) = state.store.audit().log(&event) {
        tracing::warn!(error = %err, "failed to write audit event");
    }
    tracing::info!(user_id = id, "wallet balances overridden");

    Ok(Json(MessageResponse {
        message: "Balance updated successfully".to_string(),
    }))
}

// ============================================================================
// Reviews
// ============================================================================

/// List every review with reviewer emails, newest first. Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reviews", body = [ReviewResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn list_all_reviews(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = state
        .store
        .reviews()
        .list_with_reviewer_email()
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(reviews))
}

/// Edit a review's rating and comment. Admin only.
#[utoipa::path(
    put,
    path = "/api/admin/reviews/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated successfully", body = MessageResponse),
        (status = 400, description = "Rating out of range"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_review(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !(1..=5).contains(&request.rating) {
        return Err(ApiError::bad_request("Rating must be between 1 and 5"));
    }

    state
        .store
        .reviews()
        .update(id, request.rating, &request.comment)
        .map_err(|err| ApiError::storage("Error updating review", err))?;

    audit_log!(&state.store, AuditEventType::ReviewUpdated, admin, "review", id);

    Ok(Json(MessageResponse {
        message: "Review updated successfully".to_string(),
    }))
}

/// Delete a review. Admin only.
#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted successfully", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_review(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .reviews()
        .delete(id)
        .map_err(|err| ApiError::storage("Error deleting review", err))?;

    audit_log!(&state.store, AuditEventType::ReviewDeleted, admin, "review", id);

    Ok(Json(MessageResponse {
        message: "Review deleted successfully".to_string(),
    }))
}

// ============================================================================
// Site Content
// ============================================================================

/// List every site content entry. Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/site-content",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All site content entries", body = [StoredSiteContent]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn list_site_content(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredSiteContent>>, ApiError> {
    let entries = state
        .store
        .site_content()
        .list_all()
        .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(entries))
}

/// Insert or replace a site content entry. Admin only.
#[utoipa::path(
    put,
    path = "/api/admin/site-content",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = UpdateSiteContentRequest,
    responses(
        (status = 200, description = "Content updated successfully", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_site_content(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<UpdateSiteContentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .site_content()
        .upsert(
            &request.page,
            &request.section,
            &request.content,
            &request.content_type,
        )
        .map_err(|err| ApiError::storage("Error updating content", err))?;

    let event = AuditEvent::new(AuditEventType::SiteContentUpdated)
        .with_user(admin.id)
        .with_details(serde_json::json!({
            "page": request.page,
            "section": request.section,
        }));
    if let Err(err) = state.store.audit().log(&event) {
        tracing::warn!(error = %err, "failed to write audit event");
    }

    Ok(Json(MessageResponse {
        message: "Content updated successfully".to_string(),
    }))
}

// ============================================================================
// Tests
// ============================================================================
