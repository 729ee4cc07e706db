// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Movie catalog handlers. Every route needs a signed-in user.

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::movie::{Genre, GenreFilterQuery, Movie, MovieSearchQuery, PagesQuery};
use crate::models::review::ReviewDto;
use crate::routes::extract::{ApiPath, ApiQuery};
use crate::services::auth_middleware::{AuthUser, RequireModerator};
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

pub fn movies_router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_handler))
        .route("/pages", get(pages_handler))
        .route("/genres", get(genres_handler))
        .route("/genrefilter", get(genre_filter_handler))
        .route("/{id}", get(movie_handler).delete(delete_movie_handler))
        .route("/{id}/reviews", get(movie_reviews_handler))
}

/// GET /movies - Search movies by title, one page at a time.
#[utoipa::path(
    get,
    path = "/movies",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive title fragment"),
        ("page" = Option<i64>, Query, description = "Zero-based page")
    ),
    responses(
        (status = 200, description = "One page of movies", body = [Movie]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No movies match")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn search_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiQuery(query): ApiQuery<MovieSearchQuery>,
) -> ApiResult<Json<Vec<Movie>>> {
    Ok(Json(state.movies.search(&query.title, query.page).await?))
}

/// GET /movies/pages - Number of result pages for a title search.
#[utoipa::path(
    get,
    path = "/movies/pages",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive title fragment")
    ),
    responses(
        (status = 200, description = "Page count", body = i64),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn pages_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiQuery(query): ApiQuery<PagesQuery>,
) -> ApiResult<Json<i64>> {
    Ok(Json(state.movies.pages(&query.title).await?))
}

/// GET /movies/{id} - One movie.
#[utoipa::path(
    get,
    path = "/movies/{id}",
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "The movie", body = Movie),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Movie not found")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn movie_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Movie>> {
    Ok(Json(state.movies.find_by_id(id).await?))
}

/// GET /movies/genres - All genres.
#[utoipa::path(
    get,
    path = "/movies/genres",
    responses(
        (status = 200, description = "Genres", body = [Genre]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Genres have not been loaded")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn genres_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<Vec<Genre>>> {
    Ok(Json(state.movies.genres().await?))
}

/// GET /movies/genrefilter - Movies of the named genres.
#[utoipa::path(
    get,
    path = "/movies/genrefilter",
    params(
        ("genres" = String, Query, description = "Comma-separated genre names")
    ),
    responses(
        (status = 200, description = "Matching movies", body = [Movie]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Unknown genre")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn genre_filter_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiQuery(query): ApiQuery<GenreFilterQuery>,
) -> ApiResult<Json<Vec<Movie>>> {
    Ok(Json(state.movies.filter_by_genres(&query.names()).await?))
}

/// GET /movies/{id}/reviews - Reviews of one movie.
#[utoipa::path(
    get,
    path = "/movies/{id}/reviews",
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "Reviews", body = [ReviewDto]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn movie_reviews_handler(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Vec<ReviewDto>>> {
    Ok(Json(state.reviews.for_movie(id).await?))
}

/// DELETE /movies/{id} - Remove a movie from the catalog.
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "Deleted", body = bool),
        (status = 403, description = "Moderator only"),
        (status = 404, description = "Movie not found")
    ),
    security(("bearer" = [])),
    tag = "movies"
)]
pub async fn delete_movie_handler(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<bool>> {
    state.movies.delete(id).await?;
    Ok(Json(true))
}
