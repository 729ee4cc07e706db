// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Movie catalog queries.

use crate::error::{ApiError, ApiResult};
use crate::models::movie::{page_count, Genre, Movie, PAGE_SIZE};
use crate::services::store::Store;
use std::sync::Arc;

pub struct MovieService {
    store: Arc<dyn Store>,
}

impl MovieService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// One page of movies whose title contains `title`.
    pub async fn search(&self, title: &str, page: i64) -> ApiResult<Vec<Movie>> {
        if page < 0 {
            return Err(ApiError::BadRequest("Page cannot be negative".to_string()));
        }
        let offset = page
            .checked_mul(PAGE_SIZE)
            .ok_or_else(|| ApiError::BadRequest("Page is out of range".to_string()))?;
        let movies = self
            .store
            .search_movies(title, offset, PAGE_SIZE)
            .await?;
        if movies.is_empty() {
            return Err(ApiError::MovieNotFound);
        }
        Ok(movies)
    }

    pub async fn pages(&self, title: &str) -> ApiResult<i64> {
        let count = self.store.count_movies_by_title(title).await?;
        Ok(page_count(count))
    }

    pub async fn find_by_id(&self, id: i64) -> ApiResult<Movie> {
        self.store
            .movie_by_id(id)
            .await?
            .ok_or(ApiError::MovieNotFound)
    }

    pub async fn count(&self) -> ApiResult<i64> {
        Ok(self.store.count_movies().await?)
    }

    pub async fn genres(&self) -> ApiResult<Vec<Genre>> {
        let genres = self.store.list_genres().await?;
        if genres.is_empty() {
            return Err(ApiError::GenresNotLoaded);
        }
        Ok(genres)
    }

    /// Movies of each named genre, concatenated in request order.
    pub async fn filter_by_genres(&self, names: &[String]) -> ApiResult<Vec<Movie>> {
        let mut movies = Vec::new();
        for name in names {
            let genre = self
                .store
                .genre_by_name(name)
                .await?
                .ok_or_else(|| ApiError::GenreNotFound(name.clone()))?;
            movies.extend(self.store.movies_by_genre(genre.id).await?);
        }
        Ok(movies)
    }

    /// Save a movie with its genre links. Titles are unique across the catalog.
    pub async fn save(&self, movie: &Movie) -> ApiResult<()> {
        if let Some(existing) = self.store.movie_by_title(&movie.title).await? {
            if existing.id != movie.id {
                return Err(ApiError::DuplicateMovie(movie.title.clone()));
            }
        }
        self.store.upsert_movie(movie).await?;
        for genre in &movie.genres {
            self.store.link_movie_genre(movie.id, genre.id).await?;
        }
        Ok(())
    }

    pub async fn save_genres(&self, genres: &[Genre]) -> ApiResult<()> {
        for genre in genres {
            self.store.upsert_genre(genre).await?;
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if !self.store.delete_movie(id).await? {
            return Err(ApiError::MovieNotFound);
        }
        tracing::info!(movie_id = id, "Movie deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{movie, store};

    fn genre(id: i64, name: &str) -> Genre {
        Genre {
            id,
            name: name.to_string(),
        }
    }

    async fn seeded() -> MovieService {
        let service = MovieService::new(store());
        service
            .save_genres(&[genre(18, "Drama"), genre(80, "Crime")])
            .await
            .unwrap();
        for i in 1..=11 {
            let mut m = movie(i, &format!("The Movie {i}"));
            m.genres = if i % 2 == 0 {
                vec![genre(18, "Drama")]
            } else {
                vec![genre(80, "Crime")]
            };
            service.save(&m).await.unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_search_pages() {
        let service = seeded().await;
        assert_eq!(service.search("movie", 0).await.unwrap().len(), 10);
        assert_eq!(service.search("MOVIE", 1).await.unwrap().len(), 1);
        assert!(matches!(
            service.search("movie", 2).await,
            Err(ApiError::MovieNotFound)
        ));
        assert_eq!(service.pages("movie").await.unwrap(), 2);
        assert_eq!(service.pages("nothing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_rejects_out_of_range_page() {
        let service = seeded().await;
        assert!(matches!(
            service.search("movie", i64::MAX / 5).await,
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            service.search("movie", -1).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_genres() {
        let empty = MovieService::new(store());
        assert!(matches!(
            empty.genres().await,
            Err(ApiError::GenresNotLoaded)
        ));

        let service = seeded().await;
        assert_eq!(service.genres().await.unwrap().len(), 2);

        let dramas = service
            .filter_by_genres(&["drama".to_string()])
            .await
            .unwrap();
        assert_eq!(dramas.len(), 5);
        let both = service
            .filter_by_genres(&["Drama".to_string(), "Crime".to_string()])
            .await
            .unwrap();
        assert_eq!(both.len(), 11);
        assert!(matches!(
            service.filter_by_genres(&["Western".to_string()]).await,
            Err(ApiError::GenreNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_title() {
        let service = MovieService::new(store());
        service.save(&movie(1, "Heat")).await.unwrap();
        assert!(matches!(
            service.save(&movie(2, "Heat")).await,
            Err(ApiError::DuplicateMovie(_))
        ));
        // Same id is an update
        service.save(&movie(1, "Heat")).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let service = seeded().await;
        let found = service.find_by_id(2).await.unwrap();
        assert_eq!(found.genres[0].name, "Drama");

        service.delete(2).await.unwrap();
        assert!(matches!(
            service.find_by_id(2).await,
            Err(ApiError::MovieNotFound)
        ));
        assert!(matches!(service.delete(2).await, Err(ApiError::MovieNotFound)));
        assert_eq!(service.count().await.unwrap(), 10);
    }
}
