// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Embedded in-process store for development and tests.

use super::{CreateCommentParams, CreateReviewParams, CreateTopicParams, CreateUserParams, Store};
use crate::models::forum::{Comment, Topic};
use crate::models::friendship::{Friendship, FriendshipStatus};
use crate::models::movie::{Genre, Movie};
use crate::models::report::Report;
use crate::models::review::Review;
use crate::models::user::{PasswordResetToken, User};
use crate::models::watchlist::UserMovie;
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    movies: BTreeMap<i64, Movie>,
    genres: BTreeMap<i64, Genre>,
    movie_genres: BTreeSet<(i64, i64)>,
    user_movies: BTreeMap<i64, UserMovie>,
    reviews: BTreeMap<i64, Review>,
    friendships: BTreeMap<i64, Friendship>,
    topics: BTreeMap<i64, Topic>,
    comments: BTreeMap<i64, Comment>,
    reports: BTreeMap<i64, Report>,
    reset_tokens: BTreeMap<i64, PasswordResetToken>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn with_genres(&self, movie: &Movie) -> Movie {
        let mut movie = movie.clone();
        movie.genres = self
            .movie_genres
            .iter()
            .filter(|(movie_id, _)| *movie_id == movie.id)
            .filter_map(|(_, genre_id)| self.genres.get(genre_id).cloned())
            .collect();
        movie
    }

    fn remove_user_movies_where(&mut self, pred: impl Fn(&UserMovie) -> bool) {
        let ids: Vec<i64> = self
            .user_movies
            .values()
            .filter(|um| pred(um))
            .map(|um| um.id)
            .collect();
        for id in ids {
            self.user_movies.remove(&id);
            self.reviews.retain(|_, r| r.user_movie_id != id);
        }
    }
}

fn title_matches(movie: &Movie, needle: &str) -> bool {
    movie.title.to_lowercase().contains(&needle.to_lowercase())
}

/// In-memory store behind a single `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ========== Users ==========

    async fn insert_user(&self, params: &CreateUserParams<'_>) -> Result<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == params.email) {
            bail!("Duplicate email: {}", params.email);
        }
        if t.users.values().any(|u| u.username == params.username) {
            bail!("Duplicate username: {}", params.username);
        }
        let user = User {
            id: t.allocate_id(),
            email: params.email.to_string(),
            username: params.username.to_string(),
            password_hash: params.password_hash.to_string(),
            profile_picture: params.profile_picture.map(str::to_string),
            date_joined: params.date_joined,
            role: params.role,
            enabled: true,
            banned: false,
        };
        t.users.insert(user.id, user.clone());
        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut t = self.tables.write().await;
        if t
            .users
            .values()
            .any(|u| u.id != user.id && (u.email == user.email || u.username == user.username))
        {
            bail!("Duplicate email or username for user {}", user.id);
        }
        match t.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => bail!("User {} does not exist", user.id),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.write().await;
        if t.users.remove(&id).is_none() {
            return Ok(false);
        }
        t.friendships
            .retain(|_, f| f.user_id != id && f.friend_id != id);
        t.remove_user_movies_where(|um| um.user_id == id);
        t.reports.retain(|_, r| r.reported_user_id != id);
        t.reset_tokens.retain(|_, r| r.user_id != id);
        let topic_ids: BTreeSet<i64> = t
            .topics
            .values()
            .filter(|topic| topic.user_id == id)
            .map(|topic| topic.id)
            .collect();
        t.topics.retain(|topic_id, _| !topic_ids.contains(topic_id));
        t.comments
            .retain(|_, c| c.user_id != id && !topic_ids.contains(&c.topic_id));
        Ok(true)
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.tables.read().await.users.len() as i64)
    }

    // ========== Movies ==========

    async fn upsert_movie(&self, movie: &Movie) -> Result<()> {
        let mut t = self.tables.write().await;
        let mut stored = movie.clone();
        stored.genres.clear();
        t.movies.insert(movie.id, stored);
        Ok(())
    }

    async fn movie_by_id(&self, id: i64) -> Result<Option<Movie>> {
        let t = self.tables.read().await;
        Ok(t.movies.get(&id).map(|m| t.with_genres(m)))
    }

    async fn movie_by_title(&self, title: &str) -> Result<Option<Movie>> {
        let t = self.tables.read().await;
        Ok(t
            .movies
            .values()
            .find(|m| m.title == title)
            .map(|m| t.with_genres(m)))
    }

    async fn search_movies(&self, title: &str, offset: i64, limit: i64) -> Result<Vec<Movie>> {
        let t = self.tables.read().await;
        Ok(t
            .movies
            .values()
            .filter(|m| title_matches(m, title))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|m| t.with_genres(m))
            .collect())
    }

    async fn count_movies_by_title(&self, title: &str) -> Result<i64> {
        let t = self.tables.read().await;
        Ok(t.movies.values().filter(|m| title_matches(m, title)).count() as i64)
    }

    async fn count_movies(&self) -> Result<i64> {
        Ok(self.tables.read().await.movies.len() as i64)
    }

    async fn delete_movie(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.write().await;
        if t.movies.remove(&id).is_none() {
            return Ok(false);
        }
        t.movie_genres.retain(|(movie_id, _)| *movie_id != id);
        t.remove_user_movies_where(|um| um.movie_id == id);
        Ok(true)
    }

    async fn set_movie_avg_rating(&self, movie_id: i64, rating: Option<f64>) -> Result<()> {
        let mut t = self.tables.write().await;
        if let Some(movie) = t.movies.get_mut(&movie_id) {
            movie.mm_avg_rating = rating;
        }
        Ok(())
    }

    async fn upsert_genre(&self, genre: &Genre) -> Result<()> {
        self.tables
            .write()
            .await
            .genres
            .insert(genre.id, genre.clone());
        Ok(())
    }

    async fn link_movie_genre(&self, movie_id: i64, genre_id: i64) -> Result<()> {
        let mut t = self.tables.write().await;
        if !t.movies.contains_key(&movie_id) || !t.genres.contains_key(&genre_id) {
            bail!("Cannot link movie {movie_id} to genre {genre_id}");
        }
        t.movie_genres.insert((movie_id, genre_id));
        Ok(())
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        Ok(self.tables.read().await.genres.values().cloned().collect())
    }

    async fn genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let t = self.tables.read().await;
        Ok(t
            .genres
            .values()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn movies_by_genre(&self, genre_id: i64) -> Result<Vec<Movie>> {
        let t = self.tables.read().await;
        Ok(t
            .movie_genres
            .iter()
            .filter(|(_, g)| *g == genre_id)
            .filter_map(|(movie_id, _)| t.movies.get(movie_id))
            .map(|m| t.with_genres(m))
            .collect())
    }

    // ========== Watchlist ==========

    async fn user_movies(&self, user_id: i64) -> Result<Vec<UserMovie>> {
        let t = self.tables.read().await;
        Ok(t
            .user_movies
            .values()
            .filter(|um| um.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn user_movie(&self, user_id: i64, movie_id: i64) -> Result<Option<UserMovie>> {
        let t = self.tables.read().await;
        Ok(t
            .user_movies
            .values()
            .find(|um| um.user_id == user_id && um.movie_id == movie_id)
            .cloned())
    }

    async fn user_movie_by_id(&self, id: i64) -> Result<Option<UserMovie>> {
        Ok(self.tables.read().await.user_movies.get(&id).cloned())
    }

    async fn insert_user_movie(&self, user_id: i64, movie_id: i64) -> Result<UserMovie> {
        let mut t = self.tables.write().await;
        if t
            .user_movies
            .values()
            .any(|um| um.user_id == user_id && um.movie_id == movie_id)
        {
            bail!("Movie {movie_id} already on watchlist of user {user_id}");
        }
        let item = UserMovie {
            id: t.allocate_id(),
            user_id,
            movie_id,
            watched: false,
        };
        t.user_movies.insert(item.id, item.clone());
        Ok(item)
    }

    async fn set_watched(&self, id: i64, watched: bool) -> Result<()> {
        let mut t = self.tables.write().await;
        if let Some(item) = t.user_movies.get_mut(&id) {
            item.watched = watched;
        }
        Ok(())
    }

    async fn delete_user_movie(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.write().await;
        let existed = t.user_movies.contains_key(&id);
        t.remove_user_movies_where(|um| um.id == id);
        Ok(existed)
    }

    // ========== Reviews ==========

    async fn review_for_user_movie(&self, user_movie_id: i64) -> Result<Option<Review>> {
        let t = self.tables.read().await;
        Ok(t
            .reviews
            .values()
            .find(|r| r.user_movie_id == user_movie_id)
            .cloned())
    }

    async fn review_by_id(&self, id: i64) -> Result<Option<Review>> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn insert_review(&self, params: &CreateReviewParams<'_>) -> Result<Review> {
        let mut t = self.tables.write().await;
        if t
            .reviews
            .values()
            .any(|r| r.user_movie_id == params.user_movie_id)
        {
            bail!("Watchlist item {} already reviewed", params.user_movie_id);
        }
        let review = Review {
            id: t.allocate_id(),
            user_movie_id: params.user_movie_id,
            rating: params.rating,
            comment: params.comment.to_string(),
            review_date: params.review_date,
        };
        t.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn update_review(&self, review: &Review) -> Result<()> {
        let mut t = self.tables.write().await;
        match t.reviews.get_mut(&review.id) {
            Some(existing) => {
                *existing = review.clone();
                Ok(())
            }
            None => bail!("Review {} does not exist", review.id),
        }
    }

    async fn delete_review(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }

    async fn list_reviews(&self, limit: Option<i64>) -> Result<Vec<Review>> {
        let t = self.tables.read().await;
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
        Ok(t.reviews.values().take(take).cloned().collect())
    }

    async fn reviews_for_movie(&self, movie_id: i64) -> Result<Vec<Review>> {
        let t = self.tables.read().await;
        Ok(t
            .reviews
            .values()
            .filter(|r| {
                t.user_movies
                    .get(&r.user_movie_id)
                    .is_some_and(|um| um.movie_id == movie_id)
            })
            .cloned()
            .collect())
    }

    // ========== Friendships ==========

    async fn insert_friendship(
        &self,
        user_id: i64,
        friend_id: i64,
        status: FriendshipStatus,
        date: DateTime<Utc>,
    ) -> Result<Friendship> {
        let mut t = self.tables.write().await;
        let friendship = Friendship {
            id: t.allocate_id(),
            user_id,
            friend_id,
            status,
            friendship_date: date,
        };
        t.friendships.insert(friendship.id, friendship.clone());
        Ok(friendship)
    }

    async fn friendship_between(
        &self,
        user_id: i64,
        friend_id: i64,
    ) -> Result<Option<Friendship>> {
        let t = self.tables.read().await;
        Ok(t
            .friendships
            .values()
            .find(|f| f.user_id == user_id && f.friend_id == friend_id)
            .cloned())
    }

    async fn update_friendship_status(&self, id: i64, status: FriendshipStatus) -> Result<()> {
        let mut t = self.tables.write().await;
        if let Some(friendship) = t.friendships.get_mut(&id) {
            friendship.status = status;
        }
        Ok(())
    }

    async fn delete_friendship(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.friendships.remove(&id).is_some())
    }

    async fn friendships_for_user(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<Friendship>> {
        let t = self.tables.read().await;
        Ok(t
            .friendships
            .values()
            .filter(|f| f.status == status && (f.user_id == user_id || f.friend_id == user_id))
            .cloned()
            .collect())
    }

    // ========== Forum ==========

    async fn insert_topic(&self, params: &CreateTopicParams<'_>) -> Result<Topic> {
        let mut t = self.tables.write().await;
        let topic = Topic {
            id: t.allocate_id(),
            title: params.title.to_string(),
            description: params.description.to_string(),
            user_id: params.user_id,
            created_at: params.created_at,
        };
        t.topics.insert(topic.id, topic.clone());
        Ok(topic)
    }

    async fn topic_by_id(&self, id: i64) -> Result<Option<Topic>> {
        Ok(self.tables.read().await.topics.get(&id).cloned())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.tables.read().await.topics.values().cloned().collect())
    }

    async fn count_comments(&self, topic_id: i64) -> Result<i64> {
        let t = self.tables.read().await;
        Ok(t.comments.values().filter(|c| c.topic_id == topic_id).count() as i64)
    }

    async fn insert_comment(&self, params: &CreateCommentParams<'_>) -> Result<Comment> {
        let mut t = self.tables.write().await;
        if !t.topics.contains_key(&params.topic_id) {
            bail!("Topic {} does not exist", params.topic_id);
        }
        let comment = Comment {
            id: t.allocate_id(),
            content: params.content.to_string(),
            topic_id: params.topic_id,
            user_id: params.user_id,
            created_at: params.created_at,
        };
        t.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn comments_for_topic(&self, topic_id: i64) -> Result<Vec<Comment>> {
        let t = self.tables.read().await;
        let mut comments: Vec<Comment> = t
            .comments
            .values()
            .filter(|c| c.topic_id == topic_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    // ========== Reports ==========

    async fn insert_report(&self, reported_user_id: i64, reason: &str) -> Result<Report> {
        let mut t = self.tables.write().await;
        let report = Report {
            id: t.allocate_id(),
            reported_user_id,
            reason: reason.to_string(),
        };
        t.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn report_by_id(&self, id: i64) -> Result<Option<Report>> {
        Ok(self.tables.read().await.reports.get(&id).cloned())
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        Ok(self.tables.read().await.reports.values().cloned().collect())
    }

    async fn delete_report(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.reports.remove(&id).is_some())
    }

    // ========== Password reset tokens ==========

    async fn insert_reset_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken> {
        let mut t = self.tables.write().await;
        if t.reset_tokens.values().any(|r| r.user_id == user_id) {
            bail!("User {user_id} already holds a reset token");
        }
        let token = PasswordResetToken {
            id: t.allocate_id(),
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
        };
        t.reset_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn reset_token_for_user(&self, user_id: i64) -> Result<Option<PasswordResetToken>> {
        let t = self.tables.read().await;
        Ok(t
            .reset_tokens
            .values()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn reset_token_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>> {
        let t = self.tables.read().await;
        Ok(t
            .reset_tokens
            .values()
            .find(|r| r.token_hash == token_hash)
            .cloned())
    }

    async fn delete_reset_token(&self, id: i64) -> Result<()> {
        self.tables.write().await.reset_tokens.remove(&id);
        Ok(())
    }
}
