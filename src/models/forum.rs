// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{ApiResult, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub topic_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_by_username: String,
    pub created_by_profile_picture: Option<String>,
    pub amount_comments: i64,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: i64,
    pub content: String,
    pub username: String,
    pub profile_picture: Option<String>,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTopicRequest {
    pub title: String,
    pub description: String,
}

impl CreateTopicRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(self.title.trim().is_empty(), "Title is required.")
            .check(self.description.trim().is_empty(), "Description is required.");
        v.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(self.content.trim().is_empty(), "Content is required.");
        v.into_result()
    }
}
