// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! TMDB client and the startup seeder that fills an empty catalog.

use crate::error::ApiError;
use crate::models::movie::{round_rating, Genre, Movie};
use crate::models::user::{RegisterUserRequest, Role};
use crate::services::movies::MovieService;
use crate::services::users::UserService;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::env;
use std::sync::Arc;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Read access token, sent as a bearer token
    pub api_key: Option<String>,
    pub base_url: String,
    /// Number of top rated pages to import
    pub seed_pages: u32,
}

impl TmdbConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("TMDB_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string()),
            seed_pages: env::var("TMDB_SEED_PAGES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopRatedPage {
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    title: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    original_language: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    genres: Vec<Genre>,
}

/// A movie as imported, with the TMDB genre ids still unresolved.
#[derive(Debug, Clone)]
pub struct ImportedMovie {
    pub movie: Movie,
    pub genre_ids: Vec<i64>,
}

impl From<TmdbMovie> for ImportedMovie {
    fn from(m: TmdbMovie) -> Self {
        let release_date = m
            .release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        ImportedMovie {
            movie: Movie {
                id: m.id,
                title: m.title,
                description: m.overview,
                language: m.original_language,
                release_date,
                poster_path: m
                    .poster_path
                    .filter(|p| !p.is_empty())
                    .map(|p| format!("{POSTER_BASE_URL}{p}"))
                    .unwrap_or_default(),
                tmdb_rating: round_rating(m.vote_average),
                mm_avg_rating: None,
                genres: Vec::new(),
            },
            genre_ids: m.genre_ids,
        }
    }
}

pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await
            .with_context(|| format!("TMDB request failed: {path_and_query}"))?
            .error_for_status()
            .with_context(|| format!("TMDB returned an error for {path_and_query}"))?;
        Ok(response.json::<T>().await?)
    }

    pub async fn top_rated(&self, page: u32) -> Result<Vec<ImportedMovie>> {
        let body: TopRatedPage = self
            .get(&format!("/movie/top_rated?language=en-US&page={page}"))
            .await?;
        Ok(body.results.into_iter().map(ImportedMovie::from).collect())
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let body: GenreList = self.get("/genre/movie/list?language=en").await?;
        Ok(body.genres)
    }
}

/// Credentials for the account created on first start.
#[derive(Debug, Clone)]
pub struct DefaultUser {
    pub username: String,
    pub password: String,
}

impl DefaultUser {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DEFAULT_USER_NAME").ok().filter(|u| !u.is_empty())?;
        let password = env::var("DEFAULT_USER_PASSWORD").ok().filter(|p| !p.is_empty())?;
        Some(Self { username, password })
    }
}

/// Seeds the catalog and the default account. Runs once at startup.
pub struct Seeder {
    movies: Arc<MovieService>,
    users: Arc<UserService>,
    client: Option<TmdbClient>,
    seed_pages: u32,
    default_user: Option<DefaultUser>,
}

impl Seeder {
    pub fn new(
        movies: Arc<MovieService>,
        users: Arc<UserService>,
        config: &TmdbConfig,
        default_user: Option<DefaultUser>,
    ) -> Self {
        let client = config
            .api_key
            .as_deref()
            .map(|key| TmdbClient::new(&config.base_url, key));
        Self {
            movies,
            users,
            client,
            seed_pages: config.seed_pages,
            default_user,
        }
    }

    /// Failures are logged and never stop the server.
    pub async fn run(&self) {
        match self.seed_movies().await {
            Ok(0) => {}
            Ok(count) => tracing::info!(count, "Seeded movies from TMDB"),
            Err(e) => tracing::error!(error = %e, "Movie seeding failed"),
        }
        if let Err(e) = self.seed_default_user().await {
            tracing::error!(error = %e, "Default user seeding failed");
        }
    }

    async fn seed_movies(&self) -> Result<usize> {
        if self.movies.count().await? > 0 {
            return Ok(0);
        }
        let Some(client) = &self.client else {
            tracing::warn!("TMDB_API_KEY not set, skipping movie seeding");
            return Ok(0);
        };

        let genres = client.genres().await?;
        self.movies.save_genres(&genres).await?;

        let mut saved = 0;
        for page in 1..=self.seed_pages {
            for imported in client.top_rated(page).await? {
                let mut movie = imported.movie;
                movie.genres = genres
                    .iter()
                    .filter(|g| imported.genre_ids.contains(&g.id))
                    .cloned()
                    .collect();

                match self.movies.save(&movie).await {
                    Ok(()) => saved += 1,
                    Err(ApiError::DuplicateMovie(title)) => {
                        tracing::debug!(title, "Skipping duplicate title");
                    }
                    Err(e) => return Err(anyhow::anyhow!("Saving movie {}: {e}", movie.id)),
                }
            }
        }
        Ok(saved)
    }

    async fn seed_default_user(&self) -> Result<()> {
        let Some(default_user) = &self.default_user else {
            return Ok(());
        };
        if self.users.count().await? > 0 {
            return Ok(());
        }

        let request = RegisterUserRequest {
            email: format!("{}@mail.com", default_user.username),
            username: default_user.username.clone(),
            password: default_user.password.clone(),
        };
        let user = self.users.register_with_role(&request, Role::Mod).await?;
        tracing::info!(user_id = user.id, username = %user.username, "Created default user");
        Ok(())
    }
}
