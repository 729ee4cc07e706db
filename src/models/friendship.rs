// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{ApiResult, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "PENDING",
            FriendshipStatus::Accepted => "ACCEPTED",
            FriendshipStatus::Rejected => "REJECTED",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(FriendshipStatus::Pending),
            "ACCEPTED" => Some(FriendshipStatus::Accepted),
            "REJECTED" => Some(FriendshipStatus::Rejected),
            _ => None,
        }
    }
}

impl TryFrom<String> for FriendshipStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FriendshipStatus::parse(&value).ok_or_else(|| format!("Unknown friendship status: {value}"))
    }
}

/// `user_id` sent the request, `friend_id` received it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Friendship {
    pub id: i64,
    pub user_id: i64,
    pub friend_id: i64,
    #[sqlx(try_from = "String")]
    pub status: FriendshipStatus,
    pub friendship_date: DateTime<Utc>,
}

impl Friendship {
    /// The party that is not `user_id`.
    pub fn other_party(&self, user_id: i64) -> i64 {
        if self.user_id == user_id {
            self.friend_id
        } else {
            self.user_id
        }
    }
}

/// Friendship seen from one side; `friend_*` describes the other party.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FriendshipDto {
    pub id: i64,
    pub user_id: i64,
    pub friend_username: String,
    pub friend_profile_picture: Option<String>,
    pub status: FriendshipStatus,
    pub friendship_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FriendRequest {
    pub username: String,
}

impl FriendRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(self.username.trim().is_empty(), "Username is required.");
        v.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateFriendshipRequest {
    pub username: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FriendshipStatusQuery {
    pub status: String,
}
