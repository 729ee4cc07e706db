// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User account, watchlist and password reset handlers.

use crate::app::AppState;
use crate::error::{ApiResult, NotAcceptable};
use crate::models::auth::{MessageResponse, TokenResponse};
use crate::models::user::{
    BanStatusQuery, BanStatusResponse, PasswordResetRequest, RegisterUserRequest,
    ResetPasswordRequest, UpdateRoleRequest, UpdateUserRequest, UserDto,
};
use crate::models::watchlist::{UserMovieDto, WatchedQuery, WatchlistResponse};
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::auth_middleware::{AuthUser, RequireModerator};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_handler).get(list_users_handler))
        .route(
            "/password-reset",
            post(request_password_reset_handler).put(reset_password_handler),
        )
        .route("/username/{username}", get(user_by_username_handler))
        .route("/email/{email}", get(user_by_email_handler))
        .route("/{id}", put(update_user_handler).delete(delete_user_handler))
        .route("/{id}/role", put(update_role_handler))
        .route("/{id}/banstatus", put(ban_status_handler))
        .route("/{id}/watchlist", get(watchlist_handler))
        .route(
            "/{id}/watchlist/movie/{movie_id}",
            get(watchlist_item_handler),
        )
        .route("/{id}/watchlist/add/{movie_id}", put(add_to_watchlist_handler))
        .route(
            "/{id}/watchlist/remove/{movie_id}",
            put(remove_from_watchlist_handler),
        )
        .route("/{id}/watchlist/update/{movie_id}", put(set_watched_handler))
}

// ============================================================================
// Accounts
// ============================================================================

/// POST /users - Register a new account.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Registered", body = UserDto),
        (status = 400, description = "Validation failed or email/username taken")
    ),
    tag = "users"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let user = state.users.register(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users - List all users.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserDto]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<Vec<UserDto>>> {
    Ok(Json(state.users.find_all().await?))
}

/// GET /users/username/{username} - Find a user by username.
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn user_by_username_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.find_by_username(&username).await?))
}

/// GET /users/email/{email} - Find a user by email.
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    params(
        ("email" = String, Path, description = "Email address")
    ),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn user_by_email_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.find_by_email(&email).await?))
}

/// PUT /users/{id} - Update your own profile.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated, fresh tokens", body = TokenResponse),
        (status = 400, description = "Email or username taken"),
        (status = 401, description = "Not your account")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let pair = state.users.update_user(&actor, id, &payload).await?;
    Ok(Json(pair.into()))
}

/// PUT /users/{id}/role - Promote or demote a user.
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role changed, fresh tokens for the user", body = TokenResponse),
        (status = 403, description = "Moderator only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_role_handler(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let pair = state.users.update_role(id, &payload.role).await?;
    Ok(Json(pair.into()))
}

/// PUT /users/{id}/banstatus - Ban or unban a user.
#[utoipa::path(
    put,
    path = "/users/{id}/banstatus",
    params(
        ("id" = i64, Path, description = "User id"),
        ("banned" = bool, Query, description = "New banned status")
    ),
    responses(
        (status = 200, description = "Status changed", body = BanStatusResponse),
        (status = 403, description = "Moderator only"),
        (status = 406, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn ban_status_handler(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<BanStatusQuery>,
) -> Result<Json<BanStatusResponse>, NotAcceptable> {
    let user = state.users.set_banned(id, query.banned).await?;
    Ok(Json(BanStatusResponse {
        message: "Successfully changed banned status".to_string(),
        user_id: user.id,
        banned_status: query.banned,
        user_object: user,
    }))
}

/// DELETE /users/{id} - Delete an account and everything it owns.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.users.delete_user(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Watchlist
// ============================================================================

/// GET /users/{id}/watchlist - A user's watchlist.
#[utoipa::path(
    get,
    path = "/users/{id}/watchlist",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Watchlist items", body = [UserMovieDto]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "watchlist"
)]
pub async fn watchlist_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Vec<UserMovieDto>>> {
    Ok(Json(state.watchlist.watchlist(id).await?))
}

/// GET /users/{id}/watchlist/movie/{movie_id} - One watchlist item.
#[utoipa::path(
    get,
    path = "/users/{id}/watchlist/movie/{movie_id}",
    params(
        ("id" = i64, Path, description = "User id"),
        ("movie_id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "The item", body = UserMovieDto),
        (status = 404, description = "Not on the watchlist")
    ),
    security(("bearer" = [])),
    tag = "watchlist"
)]
pub async fn watchlist_item_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath((id, movie_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<UserMovieDto>> {
    Ok(Json(state.watchlist.item(id, movie_id).await?))
}

/// PUT /users/{id}/watchlist/add/{movie_id} - Add a movie to a watchlist.
#[utoipa::path(
    put,
    path = "/users/{id}/watchlist/add/{movie_id}",
    params(
        ("id" = i64, Path, description = "User id"),
        ("movie_id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "Added", body = WatchlistResponse),
        (status = 403, description = "Not your watchlist"),
        (status = 406, description = "Unknown user or movie, or already listed")
    ),
    security(("bearer" = [])),
    tag = "watchlist"
)]
pub async fn add_to_watchlist_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath((id, movie_id)): ApiPath<(i64, i64)>,
) -> Result<Json<WatchlistResponse>, NotAcceptable> {
    let item = state.watchlist.add(&actor, id, movie_id).await?;
    Ok(Json(WatchlistResponse {
        message: "Successfully added to watchlist".to_string(),
        user_id: id,
        movie_id,
        association_object: Some(item),
    }))
}

/// PUT /users/{id}/watchlist/remove/{movie_id} - Remove a movie and its review.
#[utoipa::path(
    put,
    path = "/users/{id}/watchlist/remove/{movie_id}",
    params(
        ("id" = i64, Path, description = "User id"),
        ("movie_id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "Removed", body = WatchlistResponse),
        (status = 403, description = "Not your watchlist"),
        (status = 406, description = "Not on the watchlist")
    ),
    security(("bearer" = [])),
    tag = "watchlist"
)]
pub async fn remove_from_watchlist_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath((id, movie_id)): ApiPath<(i64, i64)>,
) -> Result<Json<WatchlistResponse>, NotAcceptable> {
    state.watchlist.remove(&actor, id, movie_id).await?;
    Ok(Json(WatchlistResponse {
        message: "Successfully removed item from watchlist".to_string(),
        user_id: id,
        movie_id,
        association_object: None,
    }))
}

/// PUT /users/{id}/watchlist/update/{movie_id} - Mark a movie watched or unwatched.
#[utoipa::path(
    put,
    path = "/users/{id}/watchlist/update/{movie_id}",
    params(
        ("id" = i64, Path, description = "User id"),
        ("movie_id" = i64, Path, description = "Movie id"),
        ("watched" = bool, Query, description = "Watched flag")
    ),
    responses(
        (status = 200, description = "Updated", body = WatchlistResponse),
        (status = 403, description = "Not your watchlist"),
        (status = 406, description = "Not on the watchlist")
    ),
    security(("bearer" = [])),
    tag = "watchlist"
)]
pub async fn set_watched_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath((id, movie_id)): ApiPath<(i64, i64)>,
    ApiQuery(query): ApiQuery<WatchedQuery>,
) -> Result<Json<WatchlistResponse>, NotAcceptable> {
    let item = state
        .watchlist
        .set_watched(&actor, id, movie_id, query.watched)
        .await?;
    Ok(Json(WatchlistResponse {
        message: "Successfully updated watchlist item".to_string(),
        user_id: id,
        movie_id,
        association_object: Some(item),
    }))
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /users/password-reset - Email a password reset link.
#[utoipa::path(
    post,
    path = "/users/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 201, description = "Reset link sent", body = MessageResponse),
        (status = 400, description = "A valid reset token already exists"),
        (status = 404, description = "Unknown email")
    ),
    tag = "users"
)]
pub async fn request_password_reset_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PasswordResetRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    payload.validate()?;
    state
        .users
        .request_password_reset(payload.email.trim())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok(
            "A password reset link has been sent to your email",
        )),
    ))
}

/// PUT /users/password-reset - Set a new password with an emailed token.
#[utoipa::path(
    put,
    path = "/users/password-reset",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired token")
    ),
    tag = "users"
)]
pub async fn reset_password_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.reset_password(&payload).await?;
    Ok(Json(MessageResponse::ok("Your password has been reset")))
}
