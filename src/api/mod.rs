// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! HTTP API surface.
//!
//! One module per area, assembled by [`router`]. Public routes (stats,
//! sponsors, reviews listing, site content, network lookup) need no token;
//! everything else goes through the `Auth`/`AdminOnly` extractors.

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod admin;
pub mod applications;
pub mod auth;
pub mod cards;
pub mod health;
pub mod profile;
pub mod reviews;
pub mod site_content;
pub mod sponsors;
pub mod stats;
pub mod transactions;

/// Success body for mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Public
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/stats", get(stats::get_stats))
        .route("/sponsors", get(sponsors::list_sponsors))
        .route("/site-content", get(site_content::list_site_content))
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::submit_review),
        )
        .route("/transactions/networks", get(transactions::list_networks))
        // Authenticated
        .route(
            "/applications",
            get(applications::list_applications).post(applications::submit_application),
        )
        .route("/cards", post(cards::save_card))
        .route("/transactions/deposit", post(transactions::deposit))
        .route("/transactions/withdraw", post(transactions::withdraw))
        .route("/profile", get(profile::get_profile))
        // Admin
        .route("/admin/applications", get(admin::list_all_applications))
        .route(
            "/admin/applications/{id}",
            put(admin::update_application_status),
        )
        .route("/admin/reviews", get(admin::list_all_reviews))
        .route(
            "/admin/reviews/{id}",
            put(admin::update_review).delete(admin::delete_review),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/balance", put(admin::update_user_balance))
        .route(
            "/admin/site-content",
            get(admin::list_site_content).put(admin::update_site_content),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        stats::get_stats,
        sponsors::list_sponsors,
        site_content::list_site_content,
        reviews::list_reviews,
        reviews::submit_review,
        transactions::list_networks,
        transactions::deposit,
        transactions::withdraw,
        applications::list_applications,
        applications::submit_application,
        cards::save_card,
        profile::get_profile,
        admin::list_all_applications,
        admin::update_application_status,
        admin::list_all_reviews,
        admin::update_review,
        admin::delete_review,
        admin::list_users,
        admin::update_user_balance,
        admin::list_site_content,
        admin::update_site_content,
        health::health
    ),
    components(
        schemas(
            MessageResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            stats::StatsResponse,
            health::HealthResponse,
            profile::ProfileResponse,
            reviews::SubmitReviewRequest,
            cards::SaveCardRequest,
            transactions::DepositRequest,
            transactions::WithdrawRequest,
            transactions::WithdrawMethod,
            transactions::NetworkOption,
            transactions::NetworksResponse,
            admin::UpdateApplicationStatusRequest,
            admin::UpdateReviewRequest,
            admin::UpdateBalanceRequest,
            admin::UpdateSiteContentRequest,
            admin::AdminUserResponse,
            crate::auth::Role,
            crate::storage::NewApplication,
            crate::storage::StoredApplication,
            crate::storage::ApplicationStatus,
            crate::storage::ReviewResponse,
            crate::storage::StoredCard,
            crate::storage::StoredTransaction,
            crate::storage::TransactionType,
            crate::storage::TransactionStatus,
            crate::storage::StoredSiteContent,
            crate::storage::StoredSponsor,
            crate::storage::StoredWallet,
            crate::storage::UserResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Stats", description = "Landing page counters"),
        (name = "Sponsors", description = "Sponsor listing"),
        (name = "SiteContent", description = "Editable site content"),
        (name = "Applications", description = "Funding applications"),
        (name = "Reviews", description = "User reviews"),
        (name = "Cards", description = "Saved payment cards"),
        (name = "Transactions", description = "Deposits and withdrawals"),
        (name = "Profile", description = "Account profile"),
        (name = "Admin", description = "Moderation and settlement"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenCodec};
    use crate::storage::Store;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-secret";

    fn test_app() -> (Router, AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let state = AppState::new(store, TokenCodec::new(TEST_SECRET, 3600));
        (router(state.clone()), state, dir)
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bearer(request: Request<Body>, token: &str) -> Request<Body> {
        let (mut parts, body) = request.into_parts();
        parts.headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        Request::from_parts(parts, body)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str) -> StatusCode {
        let request = json_request(
            Method::POST,
            "/api/register",
            serde_json::json!({
                "email": email,
                "password": "pw12345678",
                "secretKey": "secret1",
            }),
        );
        app.clone().oneshot(request).await.unwrap().status()
    }

    async fn login(app: &Router, email: &str) -> String {
        let request = json_request(
            Method::POST,
            "/api/login",
            serde_json::json!({ "email": email, "password": "pw12345678" }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (app, _state, _dir) = test_app();
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn duplicate_email_registration_conflicts() {
        let (app, state, _dir) = test_app();

        assert_eq!(register(&app, "alice@x.com").await, StatusCode::CREATED);
        assert_eq!(register(&app, "alice@x.com").await, StatusCode::BAD_REQUEST);
        assert_eq!(state.store.users().list_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_token_decodes_to_the_account_identity() {
        let (app, state, _dir) = test_app();
        register(&app, "alice@x.com").await;

        let token = login(&app, "alice@x.com").await;
        let claims = state.tokens.verify(&token).unwrap();
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.id, state.store.users().list_all().unwrap()[0].id);
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_and_foreign_tokens() {
        let (app, _state, _dir) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let foreign = TokenCodec::new("some-other-secret", 3600)
            .issue(1, "alice@x.com", Role::User)
            .unwrap();
        let request = bearer(
            Request::builder()
                .uri("/api/profile")
                .body(Body::empty())
                .unwrap(),
            &foreign,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_routes_reject_ordinary_users() {
        let (app, state, _dir) = test_app();
        let token = state.tokens.issue(1, "user@x.com", Role::User).unwrap();

        let requests = [
            (Method::GET, "/api/admin/applications", None),
            (
                Method::PUT,
                "/api/admin/applications/1",
                Some(serde_json::json!({ "status": "approved" })),
            ),
            (Method::GET, "/api/admin/reviews", None),
            (Method::GET, "/api/admin/users", None),
            (
                Method::PUT,
                "/api/admin/users/1/balance",
                Some(serde_json::json!({ "personal_balance": 1.0, "sponsor_balance": 0.0 })),
            ),
            (Method::GET, "/api/admin/site-content", None),
        ];

        for (method, uri, body) in requests {
            let request = match body {
                Some(body) => json_request(method, uri, body),
                None => Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            };
            let response = app.clone().oneshot(bearer(request, &token)).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        }
    }

    #[tokio::test]
    async fn fresh_profile_has_the_expected_shape() {
        let (app, _state, _dir) = test_app();
        assert_eq!(register(&app, "alice@x.com").await, StatusCode::CREATED);
        let token = login(&app, "alice@x.com").await;

        let request = bearer(
            Request::builder()
                .uri("/api/profile")
                .body(Body::empty())
                .unwrap(),
            &token,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let profile = body_json(response).await;
        assert_eq!(profile["user"]["email"], "alice@x.com");
        assert_eq!(profile["user"]["role"], "user");
        assert_eq!(profile["wallet"]["personal_balance"], 0.0);
        assert_eq!(profile["wallet"]["sponsor_balance"], 0.0);
        assert_eq!(profile["transactions"], serde_json::json!([]));
        assert_eq!(profile["cards"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn approved_status_is_visible_to_the_owner() {
        let (app, state, _dir) = test_app();
        assert_eq!(register(&app, "owner@x.com").await, StatusCode::CREATED);
        let owner_token = login(&app, "owner@x.com").await;

        let submit = bearer(
            json_request(
                Method::POST,
                "/api/applications",
                serde_json::json!({
                    "project_name": "Rocket",
                    "project_type": "startup",
                    "description": "To the moon",
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": "ada@x.com",
                    "phone": "+1",
                    "amount": 1000.0,
                }),
            ),
            &owner_token,
        );
        let response = app.clone().oneshot(submit).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let admin = state
            .store
            .users()
            .create("admin@x.com", "hash", "s", Role::Admin)
            .unwrap();
        let admin_token = state
            .tokens
            .issue(admin.id, &admin.email, Role::Admin)
            .unwrap();

        let approve = bearer(
            json_request(
                Method::PUT,
                "/api/admin/applications/1",
                serde_json::json!({ "status": "approved" }),
            ),
            &admin_token,
        );
        let response = app.clone().oneshot(approve).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Application updated successfully"
        );

        let listing = bearer(
            Request::builder()
                .uri("/api/applications")
                .body(Body::empty())
                .unwrap(),
            &owner_token,
        );
        let response = app.oneshot(listing).await.unwrap();
        let applications = body_json(response).await;
        assert_eq!(applications[0]["id"], 1);
        assert_eq!(applications[0]["status"], "approved");
        assert_eq!(applications[0]["project_name"], "Rocket");
        assert_eq!(applications[0]["amount"], 1000.0);
    }

    #[tokio::test]
    async fn public_routes_need_no_token() {
        let (app, state, _dir) = test_app();
        state.store.seed_initial_content().unwrap();

        for uri in [
            "/health",
            "/api/stats",
            "/api/sponsors",
            "/api/site-content",
            "/api/reviews",
            "/api/transactions/networks?currency=USDT",
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn openapi_document_renders() {
        let document = ApiDoc::openapi().to_json().unwrap();
        assert!(document.contains("/api/transactions/withdraw"));
        assert!(document.contains("bearer_auth"));
    }
}
