// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Funding application endpoints.
//!
//! Users submit applications and list their own; admins see every
//! application through the same listing route.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{AuditEventType, NewApplication, StoredApplication},
};

use super::MessageResponse;

/// Submit a funding application.
///
/// The application starts in `pending` status.
#[utoipa::path(
    post,
    path = "/api/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    request_body = NewApplication,
    responses(
        (status = 201, description = "Application submitted successfully", body = MessageResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_application(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<NewApplication>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let application = state
        .store
        .applications()
        .create(user.id, request)
        .map_err(|err| ApiError::storage("Error submitting application", err))?;

    audit_log!(
        &state.store,
        AuditEventType::ApplicationSubmitted,
        user,
        "application",
        application.id
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Application submitted successfully".to_string(),
        }),
    ))
}

/// List applications visible to the caller, newest first.
///
/// Ordinary users see their own applications; admins see all of them.
#[utoipa::path(
    get,
    path = "/api/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Applications, newest first", body = [StoredApplication]),
        (status = 401, description = "Missing bearer token")
    )
)]
pub async fn list_applications(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredApplication>>, ApiError> {
    let applications = if user.is_admin() {
        state.store.applications().list_all()
    } else {
        state.store.applications().list_by_user(user.id)
    }
    .map_err(|err| ApiError::storage("Database error", err))?;

    Ok(Json(applications))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role, TokenCodec};
    use crate::storage::{ApplicationStatus, Store};

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let state = AppState::new(store, TokenCodec::new("test-secret", 3600));
        (state, dir)
    }

    fn principal(id: u64, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            email: format!("user{id}@x.com"),
            role,
        }
    }

    fn new_application(project: &str) -> NewApplication {
        NewApplication {
            project_name: project.to_string(),
            project_type: "startup".to_string(),
            description: "A project".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            phone: "+123".to_string(),
            amount: 5000.0,
        }
    }

    #[tokio::test]
    async fn submitting_creates_a_pending_application() {
        let (state, _dir) = test_state();

        let (status, body) = submit_application(
            Auth(principal(1, Role::User)),
            State(state.clone()),
            Json(new_application("Rocket")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Application submitted successfully");

        let stored = state.store.applications().list_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, ApplicationStatus::Pending);
        assert_eq!(stored[0].user_id, 1);
    }

    #[tokio::test]
    async fn users_see_only_their_own_applications() {
        let (state, _dir) = test_state();
        state
            .store
            .applications()
            .create(1, new_application("Mine"))
            .unwrap();
        state
            .store
            .applications()
            .create(2, new_application("Theirs"))
            .unwrap();

        let Json(mine) = list_applications(Auth(principal(1, Role::User)), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].project_name, "Mine");

        let Json(all) = list_applications(Auth(principal(9, Role::Admin)), State(state))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
