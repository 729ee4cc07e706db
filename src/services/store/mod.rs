// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Persistence seam.
//!
//! Services talk to `dyn Store`; `MySqlStore` backs production and `MemoryStore`
//! backs local development and tests. Both enforce the same uniqueness and
//! cascade rules.

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use crate::models::forum::{Comment, Topic};
use crate::models::friendship::{Friendship, FriendshipStatus};
use crate::models::movie::{Genre, Movie};
use crate::models::report::Report;
use crate::models::review::Review;
use crate::models::user::{PasswordResetToken, Role, User};
use crate::models::watchlist::UserMovie;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

pub struct CreateUserParams<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub profile_picture: Option<&'a str>,
    pub date_joined: NaiveDate,
    pub role: Role,
}

pub struct CreateReviewParams<'a> {
    pub user_movie_id: i64,
    pub rating: f64,
    pub comment: &'a str,
    pub review_date: DateTime<Utc>,
}

pub struct CreateTopicParams<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

pub struct CreateCommentParams<'a> {
    pub content: &'a str,
    pub topic_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait Store: Send + Sync {
    // ========== Users ==========

    async fn insert_user(&self, params: &CreateUserParams<'_>) -> Result<User>;
    async fn user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    /// Persist every mutable column of `user`.
    async fn update_user(&self, user: &User) -> Result<()>;
    /// Delete the user and everything that references them.
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<i64>;

    // ========== Movies ==========

    /// Insert the movie or overwrite its catalog columns. Genre links are untouched.
    async fn upsert_movie(&self, movie: &Movie) -> Result<()>;
    async fn movie_by_id(&self, id: i64) -> Result<Option<Movie>>;
    async fn movie_by_title(&self, title: &str) -> Result<Option<Movie>>;
    /// Case-insensitive substring match on title, ordered by id.
    async fn search_movies(&self, title: &str, offset: i64, limit: i64) -> Result<Vec<Movie>>;
    async fn count_movies_by_title(&self, title: &str) -> Result<i64>;
    async fn count_movies(&self) -> Result<i64>;
    /// Delete the movie with its watchlist items, reviews and genre links.
    async fn delete_movie(&self, id: i64) -> Result<bool>;
    async fn set_movie_avg_rating(&self, movie_id: i64, rating: Option<f64>) -> Result<()>;

    async fn upsert_genre(&self, genre: &Genre) -> Result<()>;
    async fn link_movie_genre(&self, movie_id: i64, genre_id: i64) -> Result<()>;
    async fn list_genres(&self) -> Result<Vec<Genre>>;
    async fn genre_by_name(&self, name: &str) -> Result<Option<Genre>>;
    async fn movies_by_genre(&self, genre_id: i64) -> Result<Vec<Movie>>;

    // ========== Watchlist ==========

    async fn user_movies(&self, user_id: i64) -> Result<Vec<UserMovie>>;
    async fn user_movie(&self, user_id: i64, movie_id: i64) -> Result<Option<UserMovie>>;
    async fn user_movie_by_id(&self, id: i64) -> Result<Option<UserMovie>>;
    async fn insert_user_movie(&self, user_id: i64, movie_id: i64) -> Result<UserMovie>;
    async fn set_watched(&self, id: i64, watched: bool) -> Result<()>;
    /// Delete the watchlist item and its review.
    async fn delete_user_movie(&self, id: i64) -> Result<bool>;

    // ========== Reviews ==========

    async fn review_for_user_movie(&self, user_movie_id: i64) -> Result<Option<Review>>;
    async fn review_by_id(&self, id: i64) -> Result<Option<Review>>;
    async fn insert_review(&self, params: &CreateReviewParams<'_>) -> Result<Review>;
    async fn update_review(&self, review: &Review) -> Result<()>;
    async fn delete_review(&self, id: i64) -> Result<bool>;
    /// All reviews ordered by id, at most `limit` when given.
    async fn list_reviews(&self, limit: Option<i64>) -> Result<Vec<Review>>;
    async fn reviews_for_movie(&self, movie_id: i64) -> Result<Vec<Review>>;

    // ========== Friendships ==========

    async fn insert_friendship(
        &self,
        user_id: i64,
        friend_id: i64,
        status: FriendshipStatus,
        date: DateTime<Utc>,
    ) -> Result<Friendship>;
    /// Friendship sent by `user_id` to `friend_id`. Direction matters.
    async fn friendship_between(&self, user_id: i64, friend_id: i64)
        -> Result<Option<Friendship>>;
    async fn update_friendship_status(&self, id: i64, status: FriendshipStatus) -> Result<()>;
    async fn delete_friendship(&self, id: i64) -> Result<bool>;
    /// Friendships with `status` where the user is either party.
    async fn friendships_for_user(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>>;

    // ========== Forum ==========

    async fn insert_topic(&self, params: &CreateTopicParams<'_>) -> Result<Topic>;
    async fn topic_by_id(&self, id: i64) -> Result<Option<Topic>>;
    async fn list_topics(&self) -> Result<Vec<Topic>>;
    async fn count_comments(&self, topic_id: i64) -> Result<i64>;
    async fn insert_comment(&self, params: &CreateCommentParams<'_>) -> Result<Comment>;
    /// Comments oldest first.
    async fn comments_for_topic(&self, topic_id: i64) -> Result<Vec<Comment>>;

    // ========== Reports ==========

    async fn insert_report(&self, reported_user_id: i64, reason: &str) -> Result<Report>;
    async fn report_by_id(&self, id: i64) -> Result<Option<Report>>;
    async fn list_reports(&self) -> Result<Vec<Report>>;
    async fn delete_report(&self, id: i64) -> Result<bool>;

    // ========== Password reset tokens ==========

    async fn insert_reset_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken>;
    async fn reset_token_for_user(&self, user_id: i64) -> Result<Option<PasswordResetToken>>;
    async fn reset_token_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>>;
    async fn delete_reset_token(&self, id: i64) -> Result<()>;
}

/// Open the store selected by `database_url`.
///
/// `mysql://` URLs connect to MySQL and run migrations; `None` or `memory`
/// uses the embedded store.
pub async fn connect(database_url: Option<&str>, max_connections: u32) -> Result<Arc<dyn Store>> {
    match database_url {
        Some(url) if url.starts_with("mysql://") => {
            let store = MySqlStore::connect(url, max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        Some(url) if url != "memory" => {
            anyhow::bail!("Unsupported DATABASE_URL scheme, expected mysql:// or memory")
        }
        _ => {
            tracing::warn!("DATABASE_URL not set, using the embedded in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
