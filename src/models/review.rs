// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{ApiResult, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// Review attached to a watchlist item. One per item.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub user_movie_id: i64,
    pub rating: f64,
    pub comment: String,
    pub review_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub user_profile_picture: Option<String>,
    pub movie_id: i64,
    pub movie_title: String,
    pub rating: f64,
    pub review_body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: i64,
    pub movie_id: i64,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(
            !(MIN_RATING..=MAX_RATING).contains(&self.rating),
            "Rating must be between 0 and 10",
        );
        v.into_result()
    }
}

/// Mean of the given ratings, `None` for an empty slice.
pub fn average_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[8.0]), Some(8.0));
        assert_eq!(average_rating(&[6.0, 9.0]), Some(7.5));
    }

    #[test]
    fn test_rating_bounds() {
        let mut request = CreateReviewRequest {
            user_id: 1,
            movie_id: 2,
            rating: 10.0,
            comment: String::new(),
        };
        assert!(request.validate().is_ok());
        request.rating = 10.5;
        assert!(request.validate().is_err());
        request.rating = -1.0;
        assert!(request.validate().is_err());
    }
}
