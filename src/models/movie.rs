// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of movies per search page.
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Catalog entry. The id is the TMDB movie id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub release_date: Option<NaiveDate>,
    pub poster_path: String,
    pub tmdb_rating: f64,
    /// Average of community review ratings, absent until the first review.
    pub mm_avg_rating: Option<f64>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Round a rating to one decimal place.
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Number of pages needed to show `count` movies.
pub fn page_count(count: i64) -> i64 {
    (count + PAGE_SIZE - 1) / PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct MovieSearchQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub page: i64,
}

#[derive(Debug, Deserialize)]
pub struct PagesQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreFilterQuery {
    /// Comma-separated genre names.
    pub genres: String,
}

impl GenreFilterQuery {
    pub fn names(&self) -> Vec<String> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(8.456), 8.5);
        assert_eq!(round_rating(7.04), 7.0);
        assert_eq!(round_rating(0.0), 0.0);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(10), 1);
        assert_eq!(page_count(11), 2);
        assert_eq!(page_count(25), 3);
    }

    #[test]
    fn test_genre_filter_names() {
        let query = GenreFilterQuery {
            genres: "Drama, Crime,,".to_string(),
        };
        assert_eq!(query.names(), vec!["Drama", "Crime"]);
    }
}
