// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::forum::{CommentDto, CreateCommentRequest, CreateTopicRequest, TopicDto};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::services::auth_middleware::AuthUser;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn forum_router() -> Router<AppState> {
    Router::new()
        .route("/topics", get(list_topics_handler).post(create_topic_handler))
        .route("/topics/{id}", get(topic_handler))
        .route(
            "/topics/{id}/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
}

/// GET /forum/topics - All topics.
#[utoipa::path(
    get,
    path = "/forum/topics",
    responses(
        (status = 200, description = "Topics", body = [TopicDto]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "forum"
)]
pub async fn list_topics_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<Vec<TopicDto>>> {
    Ok(Json(state.forum.topics().await?))
}

/// GET /forum/topics/{id} - One topic.
#[utoipa::path(
    get,
    path = "/forum/topics/{id}",
    params(
        ("id" = i64, Path, description = "Topic id")
    ),
    responses(
        (status = 200, description = "The topic", body = TopicDto),
        (status = 404, description = "Topic not found")
    ),
    security(("bearer" = [])),
    tag = "forum"
)]
pub async fn topic_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TopicDto>> {
    Ok(Json(state.forum.topic(id).await?))
}

/// POST /forum/topics - Start a topic.
#[utoipa::path(
    post,
    path = "/forum/topics",
    request_body = CreateTopicRequest,
    responses(
        (status = 201, description = "Created", body = TopicDto),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer" = [])),
    tag = "forum"
)]
pub async fn create_topic_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(payload): ApiJson<CreateTopicRequest>,
) -> ApiResult<(StatusCode, Json<TopicDto>)> {
    let topic = state.forum.create_topic(&actor, &payload).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

/// GET /forum/topics/{id}/comments - Comments, oldest first.
#[utoipa::path(
    get,
    path = "/forum/topics/{id}/comments",
    params(
        ("id" = i64, Path, description = "Topic id")
    ),
    responses(
        (status = 200, description = "Comments", body = [CommentDto]),
        (status = 404, description = "Topic not found")
    ),
    security(("bearer" = [])),
    tag = "forum"
)]
pub async fn list_comments_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Vec<CommentDto>>> {
    Ok(Json(state.forum.comments(id).await?))
}

/// POST /forum/topics/{id}/comments - Comment on a topic.
#[utoipa::path(
    post,
    path = "/forum/topics/{id}/comments",
    params(
        ("id" = i64, Path, description = "Topic id")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Created", body = CommentDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Topic not found")
    ),
    security(("bearer" = [])),
    tag = "forum"
)]
pub async fn create_comment_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentDto>)> {
    let comment = state.forum.add_comment(&actor, id, &payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
