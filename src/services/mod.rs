// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod auth;
pub mod auth_middleware;
pub mod email;
pub mod forum;
pub mod friendships;
pub mod logging;
pub mod movies;
pub mod reports;
pub mod reviews;
pub mod store;
pub mod tmdb;
pub mod users;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::movie::Movie;
    use crate::models::user::{Role, User};
    use crate::services::store::{CreateUserParams, MemoryStore, Store};
    use chrono::NaiveDate;
    use std::sync::Arc;

    pub fn store() -> Arc<dyn Store> {
        Arc::new(MemoryStore::new())
    }

    pub async fn create_user(store: &Arc<dyn Store>, username: &str, role: Role) -> User {
        store
            .insert_user(&CreateUserParams {
                email: &format!("{username}@example.com"),
                username,
                password_hash: "unused",
                profile_picture: Some("https://img.example.com/avatar.png"),
                date_joined: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                role,
            })
            .await
            .unwrap()
    }

    pub fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            description: format!("About {title}"),
            language: "en".to_string(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15),
            poster_path: format!("https://image.tmdb.org/t/p/original/{id}.jpg"),
            tmdb_rating: 8.3,
            mm_avg_rating: None,
            genres: Vec::new(),
        }
    }
}
