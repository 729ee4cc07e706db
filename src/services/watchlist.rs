// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Per-user watchlists.

use crate::error::{ApiError, ApiResult};
use crate::models::user::User;
use crate::models::watchlist::{UserMovie, UserMovieDto, UserMovieReviewDto};
use crate::services::reviews::refresh_movie_rating;
use crate::services::store::Store;
use std::sync::Arc;

pub struct WatchlistService {
    store: Arc<dyn Store>,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn watchlist(&self, user_id: i64) -> ApiResult<Vec<UserMovieDto>> {
        self.ensure_user(user_id).await?;
        let items = self.store.user_movies(user_id).await?;
        let mut dtos = Vec::with_capacity(items.len());
        for item in items {
            dtos.push(self.to_dto(item).await?);
        }
        Ok(dtos)
    }

    pub async fn item(&self, user_id: i64, movie_id: i64) -> ApiResult<UserMovieDto> {
        self.ensure_user(user_id).await?;
        let item = self
            .store
            .user_movie(user_id, movie_id)
            .await?
            .ok_or(ApiError::UserMovieNotFound)?;
        self.to_dto(item).await
    }

    pub async fn add(&self, actor: &User, user_id: i64, movie_id: i64) -> ApiResult<UserMovieDto> {
        ensure_owner(actor, user_id)?;
        self.ensure_user(user_id).await?;
        if self.store.movie_by_id(movie_id).await?.is_none() {
            return Err(ApiError::MovieNotFound);
        }
        if self.store.user_movie(user_id, movie_id).await?.is_some() {
            return Err(ApiError::AlreadyInWatchlist);
        }

        let item = self.store.insert_user_movie(user_id, movie_id).await?;
        tracing::info!(user_id, movie_id, "Movie added to watchlist");
        self.to_dto(item).await
    }

    /// Remove a movie and its review from the watchlist.
    pub async fn remove(&self, actor: &User, user_id: i64, movie_id: i64) -> ApiResult<()> {
        ensure_owner(actor, user_id)?;
        self.ensure_user(user_id).await?;
        let item = self
            .store
            .user_movie(user_id, movie_id)
            .await?
            .ok_or(ApiError::UserMovieNotFound)?;

        self.store.delete_user_movie(item.id).await?;
        refresh_movie_rating(self.store.as_ref(), movie_id).await?;
        tracing::info!(user_id, movie_id, "Movie removed from watchlist");
        Ok(())
    }

    pub async fn set_watched(
        &self,
        actor: &User,
        user_id: i64,
        movie_id: i64,
        watched: bool,
    ) -> ApiResult<UserMovieDto> {
        ensure_owner(actor, user_id)?;
        self.ensure_user(user_id).await?;
        let mut item = self
            .store
            .user_movie(user_id, movie_id)
            .await?
            .ok_or(ApiError::UserMovieNotFound)?;

        self.store.set_watched(item.id, watched).await?;
        item.watched = watched;
        self.to_dto(item).await
    }

    async fn ensure_user(&self, user_id: i64) -> ApiResult<()> {
        match self.store.user_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::UserNotFound),
        }
    }

    async fn to_dto(&self, item: UserMovie) -> ApiResult<UserMovieDto> {
        let movie = self
            .store
            .movie_by_id(item.movie_id)
            .await?
            .ok_or(ApiError::MovieNotFound)?;
        let review = self.store.review_for_user_movie(item.id).await?;

        Ok(UserMovieDto {
            id: item.id,
            movie,
            watched: item.watched,
            review: review.as_ref().map(UserMovieReviewDto::from),
        })
    }
}

/// Watchlists are edited by their owner or a moderator.
fn ensure_owner(actor: &User, user_id: i64) -> ApiResult<()> {
    if actor.id == user_id || actor.is_moderator() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You can only change your own watchlist".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::services::store::CreateReviewParams;
    use crate::services::test_support::{create_user, movie, store};
    use chrono::Utc;

    async fn setup() -> (Arc<dyn Store>, WatchlistService, User) {
        let store = store();
        let alice = create_user(&store, "alice", Role::User).await;
        store.upsert_movie(&movie(1, "Heat")).await.unwrap();
        store.upsert_movie(&movie(2, "Ronin")).await.unwrap();
        (store.clone(), WatchlistService::new(store), alice)
    }

    #[tokio::test]
    async fn test_add_list_and_toggle_watched() {
        let (_store, service, alice) = setup().await;

        let added = service.add(&alice, alice.id, 1).await.unwrap();
        assert_eq!(added.movie.title, "Heat");
        assert!(!added.watched);
        assert!(added.review.is_none());

        service.add(&alice, alice.id, 2).await.unwrap();
        assert_eq!(service.watchlist(alice.id).await.unwrap().len(), 2);

        let updated = service.set_watched(&alice, alice.id, 1, true).await.unwrap();
        assert!(updated.watched);
        assert!(service.item(alice.id, 1).await.unwrap().watched);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates_and_unknowns() {
        let (_store, service, alice) = setup().await;
        service.add(&alice, alice.id, 1).await.unwrap();

        assert!(matches!(
            service.add(&alice, alice.id, 1).await,
            Err(ApiError::AlreadyInWatchlist)
        ));
        assert!(matches!(
            service.add(&alice, alice.id, 99).await,
            Err(ApiError::MovieNotFound)
        ));
        assert!(matches!(
            service.watchlist(12345).await,
            Err(ApiError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_only_owner_or_moderator_edits() {
        let (store, service, alice) = setup().await;
        let bob = create_user(&store, "bobby", Role::User).await;
        let moderator = create_user(&store, "moderator", Role::Mod).await;

        assert!(matches!(
            service.add(&bob, alice.id, 1).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(service.add(&moderator, alice.id, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_drops_review_and_rating() {
        let (store, service, alice) = setup().await;
        let added = service.add(&alice, alice.id, 1).await.unwrap();
        store
            .insert_review(&CreateReviewParams {
                user_movie_id: added.id,
                rating: 7.0,
                comment: "ok",
                review_date: Utc::now(),
            })
            .await
            .unwrap();
        store.set_movie_avg_rating(1, Some(7.0)).await.unwrap();

        service.remove(&alice, alice.id, 1).await.unwrap();

        assert!(store.reviews_for_movie(1).await.unwrap().is_empty());
        assert_eq!(store.movie_by_id(1).await.unwrap().unwrap().mm_avg_rating, None);
        assert!(matches!(
            service.remove(&alice, alice.id, 1).await,
            Err(ApiError::UserMovieNotFound)
        ));
    }
}
