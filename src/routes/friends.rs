// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::friendship::{
    FriendRequest, FriendshipDto, FriendshipStatusQuery, UpdateFriendshipRequest,
};
use crate::routes::extract::{ApiJson, ApiQuery};
use crate::services::auth_middleware::AuthUser;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn friends_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_friends_handler)
            .post(add_friend_handler)
            .put(update_friendship_handler)
            .delete(remove_friend_handler),
    )
}

/// POST /friends - Send a friend request.
#[utoipa::path(
    post,
    path = "/friends",
    request_body = FriendRequest,
    responses(
        (status = 201, description = "Request sent", body = FriendshipDto),
        (status = 400, description = "Yourself or already friends"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "friends"
)]
pub async fn add_friend_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(payload): ApiJson<FriendRequest>,
) -> ApiResult<(StatusCode, Json<FriendshipDto>)> {
    payload.validate()?;
    let friendship = state
        .friendships
        .add(&actor, payload.username.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(friendship)))
}

/// PUT /friends - Answer a friend request.
#[utoipa::path(
    put,
    path = "/friends",
    request_body = UpdateFriendshipRequest,
    responses(
        (status = 200, description = "Updated", body = FriendshipDto),
        (status = 400, description = "Missing status or request"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "friends"
)]
pub async fn update_friendship_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(payload): ApiJson<UpdateFriendshipRequest>,
) -> ApiResult<Json<FriendshipDto>> {
    let friendship = state
        .friendships
        .update(&actor, payload.username.trim(), payload.status.as_deref())
        .await?;
    Ok(Json(friendship))
}

/// GET /friends - Your friendships with a status.
#[utoipa::path(
    get,
    path = "/friends",
    params(
        ("status" = String, Query, description = "PENDING, ACCEPTED or DECLINED")
    ),
    responses(
        (status = 200, description = "Friendships", body = [FriendshipDto]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "friends"
)]
pub async fn list_friends_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<FriendshipStatusQuery>,
) -> ApiResult<Json<Vec<FriendshipDto>>> {
    Ok(Json(state.friendships.list(&actor, &query.status).await?))
}

/// DELETE /friends - Remove a friendship.
#[utoipa::path(
    delete,
    path = "/friends",
    request_body = FriendRequest,
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not friends"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "friends"
)]
pub async fn remove_friend_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(payload): ApiJson<FriendRequest>,
) -> ApiResult<StatusCode> {
    payload.validate()?;
    state
        .friendships
        .remove(&actor, payload.username.trim())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
