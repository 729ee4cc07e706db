// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::movie::Movie;
use crate::models::review::Review;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Association between a user and a movie on their watchlist.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserMovie {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub watched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMovieReviewDto {
    pub review_id: i64,
    pub rating: f64,
    pub comment: String,
    pub review_date: DateTime<Utc>,
}

impl From<&Review> for UserMovieReviewDto {
    fn from(review: &Review) -> Self {
        Self {
            review_id: review.id,
            rating: review.rating,
            comment: review.comment.clone(),
            review_date: review.review_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMovieDto {
    pub id: i64,
    pub movie: Movie,
    pub watched: bool,
    pub review: Option<UserMovieReviewDto>,
}

/// Result of a watchlist mutation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WatchlistResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_object: Option<UserMovieDto>,
}

#[derive(Debug, Deserialize)]
pub struct WatchedQuery {
    pub watched: bool,
}
