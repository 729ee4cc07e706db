// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Forum topics and comments.

use crate::error::{ApiError, ApiResult};
use crate::models::forum::{
    Comment, CommentDto, CreateCommentRequest, CreateTopicRequest, Topic, TopicDto,
};
use crate::models::user::User;
use crate::services::store::{CreateCommentParams, CreateTopicParams, Store};
use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;

pub struct ForumService {
    store: Arc<dyn Store>,
}

impl ForumService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn topics(&self) -> ApiResult<Vec<TopicDto>> {
        let topics = self.store.list_topics().await?;
        let mut dtos = Vec::with_capacity(topics.len());
        for topic in topics {
            dtos.push(self.topic_dto(topic).await?);
        }
        Ok(dtos)
    }

    pub async fn topic(&self, id: i64) -> ApiResult<TopicDto> {
        let topic = self.find_topic(id).await?;
        self.topic_dto(topic).await
    }

    pub async fn create_topic(
        &self,
        actor: &User,
        request: &CreateTopicRequest,
    ) -> ApiResult<TopicDto> {
        request.validate()?;
        let topic = self
            .store
            .insert_topic(&CreateTopicParams {
                title: request.title.trim(),
                description: request.description.trim(),
                user_id: actor.id,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(topic_id = topic.id, user_id = actor.id, "Topic created");
        self.topic_dto(topic).await
    }

    pub async fn comments(&self, topic_id: i64) -> ApiResult<Vec<CommentDto>> {
        self.find_topic(topic_id).await?;
        let comments = self.store.comments_for_topic(topic_id).await?;
        let mut dtos = Vec::with_capacity(comments.len());
        for comment in comments {
            dtos.push(self.comment_dto(comment).await?);
        }
        Ok(dtos)
    }

    pub async fn add_comment(
        &self,
        actor: &User,
        topic_id: i64,
        request: &CreateCommentRequest,
    ) -> ApiResult<CommentDto> {
        request.validate()?;
        self.find_topic(topic_id).await?;
        let comment = self
            .store
            .insert_comment(&CreateCommentParams {
                content: request.content.trim(),
                topic_id,
                user_id: actor.id,
                created_at: Utc::now(),
            })
            .await?;
        self.comment_dto(comment).await
    }

    async fn find_topic(&self, id: i64) -> ApiResult<Topic> {
        self.store
            .topic_by_id(id)
            .await?
            .ok_or(ApiError::TopicNotFound)
    }

    async fn author(&self, user_id: i64) -> ApiResult<User> {
        Ok(self
            .store
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow!("Forum post references missing user {user_id}"))?)
    }

    async fn topic_dto(&self, topic: Topic) -> ApiResult<TopicDto> {
        let author = self.author(topic.user_id).await?;
        let amount_comments = self.store.count_comments(topic.id).await?;
        Ok(TopicDto {
            id: topic.id,
            title: topic.title,
            description: topic.description,
            created_by_username: author.username,
            created_by_profile_picture: author.profile_picture,
            amount_comments,
            creation_date: topic.created_at,
        })
    }

    async fn comment_dto(&self, comment: Comment) -> ApiResult<CommentDto> {
        let author = self.author(comment.user_id).await?;
        Ok(CommentDto {
            id: comment.id,
            content: comment.content,
            username: author.username,
            profile_picture: author.profile_picture,
            creation_date: comment.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::services::test_support::{create_user, store};

    #[tokio::test]
    async fn test_topic_with_comments() {
        let store = store();
        let alice = create_user(&store, "alice", Role::User).await;
        let bob = create_user(&store, "bobby", Role::User).await;
        let service = ForumService::new(store);

        let topic = service
            .create_topic(
                &alice,
                &CreateTopicRequest {
                    title: "Best heist movie?".to_string(),
                    description: "Discuss".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(topic.created_by_username, "alice");
        assert_eq!(topic.amount_comments, 0);

        for (author, text) in [(&bob, "Heat"), (&alice, "Ronin")] {
            service
                .add_comment(
                    author,
                    topic.id,
                    &CreateCommentRequest {
                        content: text.to_string(),
                    },
                )
                .await
                .unwrap();
        }

        let comments = service.comments(topic.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "Heat");
        assert_eq!(comments[0].username, "bobby");
        assert_eq!(service.topic(topic.id).await.unwrap().amount_comments, 2);
        assert_eq!(service.topics().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_and_missing_topic() {
        let store = store();
        let alice = create_user(&store, "alice", Role::User).await;
        let service = ForumService::new(store);

        let blank = CreateTopicRequest {
            title: " ".to_string(),
            description: String::new(),
        };
        match service.create_topic(&alice, &blank).await {
            Err(ApiError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected: {other:?}"),
        }

        assert!(matches!(
            service.topic(77).await,
            Err(ApiError::TopicNotFound)
        ));
        assert!(matches!(
            service
                .add_comment(
                    &alice,
                    77,
                    &CreateCommentRequest {
                        content: "hi".to_string()
                    }
                )
                .await,
            Err(ApiError::TopicNotFound)
        ));
    }
}
