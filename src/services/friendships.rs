// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Friend requests between users.

use crate::error::{ApiError, ApiResult};
use crate::models::friendship::{Friendship, FriendshipDto, FriendshipStatus};
use crate::models::user::User;
use crate::services::store::Store;
use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;

pub struct FriendshipService {
    store: Arc<dyn Store>,
}

impl FriendshipService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Send a friend request from `actor` to `username`.
    pub async fn add(&self, actor: &User, username: &str) -> ApiResult<FriendshipDto> {
        let friend = self.user_named(username).await?;
        if friend.id == actor.id {
            return Err(ApiError::CannotFriendSelf);
        }
        if self.find_either(actor.id, friend.id).await?.is_some() {
            return Err(ApiError::FriendshipAlreadyExists);
        }

        let friendship = self
            .store
            .insert_friendship(actor.id, friend.id, FriendshipStatus::Pending, Utc::now())
            .await?;
        tracing::info!(user_id = actor.id, friend_id = friend.id, "Friend request sent");
        self.to_dto(&friendship, actor.id).await
    }

    /// Answer the request that `username` sent to `actor`.
    pub async fn update(
        &self,
        actor: &User,
        username: &str,
        status: Option<&str>,
    ) -> ApiResult<FriendshipDto> {
        let status = status
            .ok_or_else(|| ApiError::BadRequest("Friendship status cannot be null.".to_string()))?;
        let status = FriendshipStatus::parse(status)
            .ok_or_else(|| ApiError::BadRequest("Invalid friendship status provided.".to_string()))?;

        let requester = self.user_named(username).await?;
        let mut friendship = self
            .store
            .friendship_between(requester.id, actor.id)
            .await?
            .ok_or(ApiError::FriendshipNotFound)?;

        self.store
            .update_friendship_status(friendship.id, status)
            .await?;
        friendship.status = status;
        tracing::info!(
            friendship_id = friendship.id,
            status = status.as_str(),
            "Friendship updated"
        );
        self.to_dto(&friendship, actor.id).await
    }

    /// Friendships with the given status in either direction.
    pub async fn list(&self, actor: &User, status: &str) -> ApiResult<Vec<FriendshipDto>> {
        let status = FriendshipStatus::parse(status)
            .ok_or_else(|| ApiError::BadRequest("Invalid friendship status provided.".to_string()))?;
        let friendships = self.store.friendships_for_user(actor.id, status).await?;

        let mut dtos = Vec::with_capacity(friendships.len());
        for friendship in &friendships {
            dtos.push(self.to_dto(friendship, actor.id).await?);
        }
        Ok(dtos)
    }

    pub async fn remove(&self, actor: &User, username: &str) -> ApiResult<()> {
        let friend = self.user_named(username).await?;
        let friendship = self
            .find_either(actor.id, friend.id)
            .await?
            .ok_or(ApiError::FriendshipNotFound)?;
        self.store.delete_friendship(friendship.id).await?;
        tracing::info!(user_id = actor.id, friend_id = friend.id, "Friendship removed");
        Ok(())
    }

    async fn user_named(&self, username: &str) -> ApiResult<User> {
        self.store
            .user_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    async fn find_either(&self, a: i64, b: i64) -> ApiResult<Option<Friendship>> {
        if let Some(friendship) = self.store.friendship_between(a, b).await? {
            return Ok(Some(friendship));
        }
        Ok(self.store.friendship_between(b, a).await?)
    }

    async fn to_dto(&self, friendship: &Friendship, viewer_id: i64) -> ApiResult<FriendshipDto> {
        let other_id = friendship.other_party(viewer_id);
        let other = self
            .store
            .user_by_id(other_id)
            .await?
            .ok_or_else(|| anyhow!("Friendship {} references missing user", friendship.id))?;

        Ok(FriendshipDto {
            id: friendship.id,
            user_id: viewer_id,
            friend_username: other.username,
            friend_profile_picture: other.profile_picture,
            status: friendship.status,
            friendship_date: friendship.friendship_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::services::test_support::{create_user, store};

    async fn setup() -> (FriendshipService, User, User) {
        let store = store();
        let alice = create_user(&store, "alice", Role::User).await;
        let bob = create_user(&store, "bobby", Role::User).await;
        (FriendshipService::new(store), alice, bob)
    }

    #[tokio::test]
    async fn test_request_and_accept() {
        let (service, alice, bob) = setup().await;

        let sent = service.add(&alice, "bobby").await.unwrap();
        assert_eq!(sent.status, FriendshipStatus::Pending);
        assert_eq!(sent.friend_username, "bobby");
        assert_eq!(sent.user_id, alice.id);

        let accepted = service
            .update(&bob, "alice", Some("accepted"))
            .await
            .unwrap();
        assert_eq!(accepted.status, FriendshipStatus::Accepted);
        assert_eq!(accepted.friend_username, "alice");

        let alice_view = service.list(&alice, "ACCEPTED").await.unwrap();
        assert_eq!(alice_view.len(), 1);
        assert_eq!(alice_view[0].friend_username, "bobby");
        let bob_view = service.list(&bob, "accepted").await.unwrap();
        assert_eq!(bob_view[0].friend_username, "alice");
    }

    #[tokio::test]
    async fn test_add_rejections() {
        let (service, alice, bob) = setup().await;

        assert!(matches!(
            service.add(&alice, "alice").await,
            Err(ApiError::CannotFriendSelf)
        ));
        assert!(matches!(
            service.add(&alice, "nobody").await,
            Err(ApiError::UserNotFound)
        ));

        service.add(&alice, "bobby").await.unwrap();
        assert!(matches!(
            service.add(&bob, "alice").await,
            Err(ApiError::FriendshipAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_update_rejections() {
        let (service, alice, bob) = setup().await;
        service.add(&alice, "bobby").await.unwrap();

        match service.update(&bob, "alice", None).await {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Friendship status cannot be null."),
            other => panic!("unexpected: {other:?}"),
        }
        match service.update(&bob, "alice", Some("blocked")).await {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Invalid friendship status provided."),
            other => panic!("unexpected: {other:?}"),
        }
        // Only the recipient answers a request
        assert!(matches!(
            service.update(&alice, "bobby", Some("ACCEPTED")).await,
            Err(ApiError::FriendshipNotFound)
        ));
    }

    #[tokio::test]
    async fn test_remove_either_direction() {
        let (service, alice, bob) = setup().await;
        service.add(&alice, "bobby").await.unwrap();

        service.remove(&bob, "alice").await.unwrap();
        assert!(service.list(&alice, "PENDING").await.unwrap().is_empty());
        assert!(matches!(
            service.remove(&bob, "alice").await,
            Err(ApiError::FriendshipNotFound)
        ));
    }
}
