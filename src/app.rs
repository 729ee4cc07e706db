// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, OpenAPI document and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::auth::{LoginRequest, MessageResponse, RefreshRequest, TokenResponse};
use crate::models::forum::{CommentDto, CreateCommentRequest, CreateTopicRequest, TopicDto};
use crate::models::friendship::{
    FriendRequest, FriendshipDto, FriendshipStatus, UpdateFriendshipRequest,
};
use crate::models::movie::{Genre, Movie};
use crate::models::report::{CreateReportRequest, ReportDto};
use crate::models::review::{CreateReviewRequest, ReviewDto};
use crate::models::user::{
    BanStatusResponse, PasswordResetRequest, RegisterUserRequest, ResetPasswordRequest, Role,
    UpdateRoleRequest, UpdateUserRequest, UserDto,
};
use crate::models::version::VersionResponse;
use crate::models::watchlist::{UserMovieDto, UserMovieReviewDto, WatchlistResponse};
use crate::routes::{
    auth_router, forum_router, friends_router, movies_router, reports_router, reviews_router,
    users_router,
};
use crate::services::auth::{AuthService, JwtService};
use crate::services::email::Mailer;
use crate::services::forum::ForumService;
use crate::services::friendships::FriendshipService;
use crate::services::movies::MovieService;
use crate::services::reports::ReportService;
use crate::services::reviews::ReviewService;
use crate::services::store::Store;
use crate::services::users::{UserService, UserServiceConfig};
use crate::services::watchlist::WatchlistService;
use anyhow::Context;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `MM_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("MM_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub watchlist: Arc<WatchlistService>,
    pub movies: Arc<MovieService>,
    pub reviews: Arc<ReviewService>,
    pub friendships: Arc<FriendshipService>,
    pub forum: Arc<ForumService>,
    pub reports: Arc<ReportService>,
    /// Only origin allowed by CORS
    pub client_host: String,
}

impl AppState {
    /// Wire every service on top of one store.
    pub fn new(
        store: Arc<dyn Store>,
        jwt: Arc<JwtService>,
        mailer: Arc<dyn Mailer>,
        user_config: UserServiceConfig,
    ) -> Self {
        let client_host = user_config.client_host.clone();
        Self {
            auth: Arc::new(AuthService::new(store.clone(), jwt.clone())),
            users: Arc::new(UserService::new(store.clone(), jwt, mailer, user_config)),
            watchlist: Arc::new(WatchlistService::new(store.clone())),
            movies: Arc::new(MovieService::new(store.clone())),
            reviews: Arc::new(ReviewService::new(store.clone())),
            friendships: Arc::new(FriendshipService::new(store.clone())),
            forum: Arc::new(ForumService::new(store.clone())),
            reports: Arc::new(ReportService::new(store)),
            client_host,
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAPI
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    info(title = "Movie Master API", description = "Movies, watchlists, reviews and friends"),
    paths(
        version_handler,
        crate::routes::auth::login_handler,
        crate::routes::auth::refresh_handler,
        crate::routes::users::register_handler,
        crate::routes::users::list_users_handler,
        crate::routes::users::user_by_username_handler,
        crate::routes::users::user_by_email_handler,
        crate::routes::users::update_user_handler,
        crate::routes::users::update_role_handler,
        crate::routes::users::ban_status_handler,
        crate::routes::users::delete_user_handler,
        crate::routes::users::watchlist_handler,
        crate::routes::users::watchlist_item_handler,
        crate::routes::users::add_to_watchlist_handler,
        crate::routes::users::remove_from_watchlist_handler,
        crate::routes::users::set_watched_handler,
        crate::routes::users::request_password_reset_handler,
        crate::routes::users::reset_password_handler,
        crate::routes::movies::search_handler,
        crate::routes::movies::pages_handler,
        crate::routes::movies::movie_handler,
        crate::routes::movies::genres_handler,
        crate::routes::movies::genre_filter_handler,
        crate::routes::movies::movie_reviews_handler,
        crate::routes::movies::delete_movie_handler,
        crate::routes::reviews::list_reviews_handler,
        crate::routes::reviews::first_reviews_handler,
        crate::routes::reviews::post_review_handler,
        crate::routes::reviews::delete_review_handler,
        crate::routes::friends::add_friend_handler,
        crate::routes::friends::update_friendship_handler,
        crate::routes::friends::list_friends_handler,
        crate::routes::friends::remove_friend_handler,
        crate::routes::forum::list_topics_handler,
        crate::routes::forum::topic_handler,
        crate::routes::forum::create_topic_handler,
        crate::routes::forum::list_comments_handler,
        crate::routes::forum::create_comment_handler,
        crate::routes::reports::create_report_handler,
        crate::routes::reports::list_reports_handler,
        crate::routes::reports::report_handler,
        crate::routes::reports::delete_report_handler,
    ),
    components(schemas(
        VersionResponse,
        LoginRequest,
        RefreshRequest,
        TokenResponse,
        MessageResponse,
        Role,
        UserDto,
        RegisterUserRequest,
        UpdateUserRequest,
        UpdateRoleRequest,
        BanStatusResponse,
        PasswordResetRequest,
        ResetPasswordRequest,
        Genre,
        Movie,
        UserMovieDto,
        UserMovieReviewDto,
        WatchlistResponse,
        ReviewDto,
        CreateReviewRequest,
        FriendshipStatus,
        FriendshipDto,
        FriendRequest,
        UpdateFriendshipRequest,
        TopicDto,
        CommentDto,
        CreateTopicRequest,
        CreateCommentRequest,
        ReportDto,
        CreateReportRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Sign in and token refresh"),
        (name = "users", description = "Accounts and password reset"),
        (name = "movies", description = "Movie catalog"),
        (name = "watchlist", description = "Per-user watchlists"),
        (name = "reviews", description = "Movie reviews"),
        (name = "friends", description = "Friend requests and friendships"),
        (name = "forum", description = "Forum topics and comments"),
        (name = "reports", description = "User reports for moderators")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
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

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "movie-master-api".to_string(),
        version: VERSION.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// CORS for the single web client origin.
pub fn cors_layer(client_host: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(client_host.trim_end_matches('/'))
        .with_context(|| format!("Invalid CLIENT_HOST: {client_host}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION]))
}

/// Build the Axum application router.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.client_host)?;

    let app = Router::new()
        .route("/version", get(version_handler))
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/movies", movies_router())
        .nest("/reviews", reviews_router())
        .nest("/friends", friends_router())
        .nest("/forum", forum_router())
        .nest("/reports", reports_router())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::tests::test_jwt;
    use crate::services::email::LogMailer;
    use crate::services::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(test_jwt()),
            Arc::new(LogMailer),
            UserServiceConfig {
                client_host: "http://localhost:5173".to_string(),
                reset_token_ttl_minutes: 15,
            },
        );
        create_router(state).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let response = test_router()
            .oneshot(Request::get("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["service"], "movie-master-api");
        assert_eq!(json["version"], VERSION);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = test_router()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/auth/login"].is_object());
        assert!(json["paths"]["/users/{id}/watchlist/add/{movie_id}"]["put"].is_object());
        assert!(json["paths"]["/forum/topics/{id}/comments"]["post"].is_object());
        assert!(json["paths"]["/reports"]["delete"].is_object());
        assert!(json["components"]["securitySchemes"]["bearer"].is_object());
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = test_router()
            .oneshot(Request::get("/friends?status=PENDING").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Unauthorized");
        assert_eq!(
            json["message"],
            "Authentication is required to access this resource"
        );
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let response = test_router()
            .oneshot(
                Request::get("/forum/topics")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid or expired jwt");
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        assert!(cors_layer("http://localhost:5173/").is_ok());
        assert!(cors_layer("bad\nhost").is_err());
    }
}
