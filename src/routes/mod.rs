// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Route handlers for the HTTP API.

pub mod auth;
pub mod extract;
pub mod forum;
pub mod friends;
pub mod movies;
pub mod reports;
pub mod reviews;
pub mod users;

pub use auth::auth_router;
pub use forum::forum_router;
pub use friends::friends_router;
pub use movies::movies_router;
pub use reports::reports_router;
pub use reviews::reviews_router;
pub use users::users_router;
