// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::review::{CreateReviewRequest, ReviewDto};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::services::auth_middleware::AuthUser;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn reviews_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews_handler).post(post_review_handler))
        .route(
            "/{id}",
            get(first_reviews_handler).delete(delete_review_handler),
        )
}

/// GET /reviews - All reviews.
#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "Reviews", body = [ReviewDto])
    ),
    tag = "reviews"
)]
pub async fn list_reviews_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<ReviewDto>>> {
    Ok(Json(state.reviews.all().await?))
}

/// GET /reviews/{amount} - The first `amount` reviews.
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(
        ("id" = i64, Path, description = "Number of reviews to return")
    ),
    responses(
        (status = 200, description = "Reviews", body = [ReviewDto]),
        (status = 400, description = "Negative amount")
    ),
    tag = "reviews"
)]
pub async fn first_reviews_handler(
    State(state): State<AppState>,
    ApiPath(amount): ApiPath<i64>,
) -> ApiResult<Json<Vec<ReviewDto>>> {
    Ok(Json(state.reviews.first(amount).await?))
}

/// POST /reviews - Review a movie on the caller's watchlist.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created or updated", body = ReviewDto),
        (status = 400, description = "Movie is not on the watchlist"),
        (status = 401, description = "Not signed in as the reviewing user")
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn post_review_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(payload): ApiJson<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewDto>)> {
    let review = state.reviews.post(&actor, &payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// DELETE /reviews/{id} - Delete a review you wrote.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(
        ("id" = i64, Path, description = "Review id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn delete_review_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.reviews.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
