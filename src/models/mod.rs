// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod auth;
pub mod forum;
pub mod friendship;
pub mod movie;
pub mod report;
pub mod review;
pub mod user;
pub mod version;
pub mod watchlist;
