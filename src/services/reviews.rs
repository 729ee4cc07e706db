// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Movie reviews and the community average rating.

use crate::error::{ApiError, ApiResult};
use crate::models::movie::round_rating;
use crate::models::review::{average_rating, CreateReviewRequest, Review, ReviewDto};
use crate::models::user::User;
use crate::services::store::{CreateReviewParams, Store};
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::Arc;

/// Recompute a movie's community rating from its reviews.
pub async fn refresh_movie_rating(store: &dyn Store, movie_id: i64) -> Result<()> {
    let ratings: Vec<f64> = store
        .reviews_for_movie(movie_id)
        .await?
        .iter()
        .map(|r| r.rating)
        .collect();
    let average = average_rating(&ratings).map(round_rating);
    store.set_movie_avg_rating(movie_id, average).await
}

pub struct ReviewService {
    store: Arc<dyn Store>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> ApiResult<Vec<ReviewDto>> {
        let reviews = self.store.list_reviews(None).await?;
        self.to_dtos(reviews).await
    }

    /// The first `amount` reviews.
    pub async fn first(&self, amount: i64) -> ApiResult<Vec<ReviewDto>> {
        if amount < 0 {
            return Err(ApiError::BadRequest("Amount cannot be negative".to_string()));
        }
        let reviews = self.store.list_reviews(Some(amount)).await?;
        self.to_dtos(reviews).await
    }

    pub async fn for_movie(&self, movie_id: i64) -> ApiResult<Vec<ReviewDto>> {
        if self.store.movie_by_id(movie_id).await?.is_none() {
            return Err(ApiError::MovieNotFound);
        }
        let reviews = self.store.reviews_for_movie(movie_id).await?;
        self.to_dtos(reviews).await
    }

    /// Create the review for a watchlist item, or update the existing one.
    pub async fn post(&self, actor: &User, request: &CreateReviewRequest) -> ApiResult<ReviewDto> {
        request.validate()?;
        if actor.id != request.user_id {
            return Err(ApiError::Unauthorized(
                "You can only post reviews as yourself".to_string(),
            ));
        }

        let item = self
            .store
            .user_movie(request.user_id, request.movie_id)
            .await?
            .ok_or(ApiError::MovieNotInWatchlist)?;

        let now = Utc::now();
        let review = match self.store.review_for_user_movie(item.id).await? {
            Some(mut existing) => {
                existing.rating = request.rating;
                existing.comment = request.comment.clone();
                existing.review_date = now;
                self.store.update_review(&existing).await?;
                existing
            }
            None => {
                self.store
                    .insert_review(&CreateReviewParams {
                        user_movie_id: item.id,
                        rating: request.rating,
                        comment: &request.comment,
                        review_date: now,
                    })
                    .await?
            }
        };

        refresh_movie_rating(self.store.as_ref(), item.movie_id).await?;
        tracing::info!(
            user_id = actor.id,
            movie_id = item.movie_id,
            review_id = review.id,
            "Review saved"
        );
        self.to_dto(review).await
    }

    /// Delete a review. Only its author or a moderator may do this.
    pub async fn delete(&self, actor: &User, review_id: i64) -> ApiResult<()> {
        let review = self
            .store
            .review_by_id(review_id)
            .await?
            .ok_or(ApiError::ReviewNotFound)?;
        let item = self
            .store
            .user_movie_by_id(review.user_movie_id)
            .await?
            .ok_or(ApiError::ReviewNotFound)?;

        if item.user_id != actor.id && !actor.is_moderator() {
            return Err(ApiError::Forbidden(
                "You can only delete your own reviews".to_string(),
            ));
        }

        self.store.delete_review(review.id).await?;
        refresh_movie_rating(self.store.as_ref(), item.movie_id).await?;
        Ok(())
    }

    async fn to_dtos(&self, reviews: Vec<Review>) -> ApiResult<Vec<ReviewDto>> {
        let mut dtos = Vec::with_capacity(reviews.len());
        for review in reviews {
            dtos.push(self.to_dto(review).await?);
        }
        Ok(dtos)
    }

    async fn to_dto(&self, review: Review) -> ApiResult<ReviewDto> {
        let item = self
            .store
            .user_movie_by_id(review.user_movie_id)
            .await?
            .ok_or_else(|| anyhow!("Review {} has no watchlist item", review.id))?;
        let user = self
            .store
            .user_by_id(item.user_id)
            .await?
            .ok_or_else(|| anyhow!("Review {} has no author", review.id))?;
        let movie = self
            .store
            .movie_by_id(item.movie_id)
            .await?
            .ok_or_else(|| anyhow!("Review {} has no movie", review.id))?;

        Ok(ReviewDto {
            id: review.id,
            user_id: user.id,
            username: user.username,
            user_profile_picture: user.profile_picture,
            movie_id: movie.id,
            movie_title: movie.title,
            rating: review.rating,
            review_body: review.comment,
        })
    }
}
