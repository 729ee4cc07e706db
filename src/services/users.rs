// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User accounts: registration, profile updates, moderation and password reset.

use crate::error::{ApiError, ApiResult};
use crate::models::user::{
    RegisterUserRequest, ResetPasswordRequest, Role, UpdateUserRequest, User, UserDto,
};
use crate::services::auth::{generate_token, hash_password, hash_token, JwtService, TokenPair};
use crate::services::email::{render_password_reset, Mailer, PASSWORD_RESET_SUBJECT};
use crate::services::logging::anonymize_email;
use crate::services::reviews::refresh_movie_rating;
use crate::services::store::{CreateUserParams, Store};
use chrono::{Duration, Utc};
use std::env;
use std::sync::Arc;

/// Configuration for account flows that link back to the client.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Base URL of the web client, used in emailed links
    pub client_host: String,
    /// Password reset token lifetime in minutes
    pub reset_token_ttl_minutes: i64,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            client_host: env::var("CLIENT_HOST")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            reset_token_ttl_minutes: env::var("PASSWORD_RESET_TTL_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),
        }
    }
}

pub struct UserService {
    store: Arc<dyn Store>,
    jwt: Arc<JwtService>,
    mailer: Arc<dyn Mailer>,
    config: UserServiceConfig,
}

impl UserService {
    pub fn new(
        store: Arc<dyn Store>,
        jwt: Arc<JwtService>,
        mailer: Arc<dyn Mailer>,
        config: UserServiceConfig,
    ) -> Self {
        Self {
            store,
            jwt,
            mailer,
            config,
        }
    }

    // ========== Registration and lookup ==========

    pub async fn register(&self, request: &RegisterUserRequest) -> ApiResult<UserDto> {
        self.register_with_role(request, Role::User).await
    }

    pub async fn register_with_role(
        &self,
        request: &RegisterUserRequest,
        role: Role,
    ) -> ApiResult<UserDto> {
        request.validate()?;

        if self.store.user_by_email(&request.email).await?.is_some() {
            return Err(ApiError::EmailTaken(request.email.clone()));
        }
        if self.store.user_by_username(&request.username).await?.is_some() {
            return Err(ApiError::UsernameTaken(request.username.clone()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .store
            .insert_user(&CreateUserParams {
                email: &request.email,
                username: &request.username,
                password_hash: &password_hash,
                profile_picture: None,
                date_joined: Utc::now().date_naive(),
                role,
            })
            .await?;

        tracing::info!(
            user_id = user.id,
            email = %anonymize_email(&user.email),
            role = user.role.as_str(),
            "User registered"
        );
        Ok(UserDto::from(&user))
    }

    pub async fn count(&self) -> ApiResult<i64> {
        Ok(self.store.count_users().await?)
    }

    pub async fn find_all(&self) -> ApiResult<Vec<UserDto>> {
        let users = self.store.list_users().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> ApiResult<User> {
        self.store
            .user_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    pub async fn find_by_username(&self, username: &str) -> ApiResult<UserDto> {
        self.store
            .user_by_username(username)
            .await?
            .map(|u| UserDto::from(&u))
            .ok_or(ApiError::UserNotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<UserDto> {
        self.store
            .user_by_email(email)
            .await?
            .map(|u| UserDto::from(&u))
            .ok_or(ApiError::UserNotFound)
    }

    // ========== Profile and moderation ==========

    /// Update the caller's own profile. Returns fresh tokens since the claims change.
    pub async fn update_user(
        &self,
        actor: &User,
        id: i64,
        request: &UpdateUserRequest,
    ) -> ApiResult<TokenPair> {
        if actor.id != id {
            return Err(ApiError::Unauthorized(
                "You can only update your own account".to_string(),
            ));
        }
        request.validate()?;

        let mut user = self.find_by_id(id).await?;

        if let Some(other) = self.store.user_by_email(&request.email).await? {
            if other.id != id {
                return Err(ApiError::EmailTaken(request.email.clone()));
            }
        }
        if let Some(other) = self.store.user_by_username(&request.username).await? {
            if other.id != id {
                return Err(ApiError::UsernameTaken(request.username.clone()));
            }
        }

        user.email = request.email.clone();
        user.username = request.username.clone();
        if let Some(picture) = &request.profile_picture {
            user.profile_picture = Some(picture.clone());
        }
        self.store.update_user(&user).await?;

        tracing::info!(user_id = user.id, "User profile updated");
        Ok(self.jwt.issue_pair(&user)?)
    }

    /// Promote or demote a user. Returns fresh tokens for the target user.
    pub async fn update_role(&self, id: i64, role: &str) -> ApiResult<TokenPair> {
        let mut user = self.find_by_id(id).await?;
        user.role = Role::from_request(role);
        self.store.update_user(&user).await?;

        tracing::info!(user_id = user.id, role = user.role.as_str(), "User role changed");
        Ok(self.jwt.issue_pair(&user)?)
    }

    pub async fn set_banned(&self, id: i64, banned: bool) -> ApiResult<UserDto> {
        let mut user = self.find_by_id(id).await?;
        user.banned = banned;
        self.store.update_user(&user).await?;

        tracing::info!(user_id = user.id, banned, "User ban status changed");
        Ok(UserDto::from(&user))
    }

    /// Delete an account with everything it owns. Allowed for the user themself or a moderator.
    pub async fn delete_user(&self, actor: &User, id: i64) -> ApiResult<()> {
        if actor.id != id && !actor.is_moderator() {
            return Err(ApiError::Forbidden(
                "You can only delete your own account".to_string(),
            ));
        }

        let reviewed_movies: Vec<i64> = self
            .store
            .user_movies(id)
            .await?
            .iter()
            .map(|item| item.movie_id)
            .collect();

        if !self.store.delete_user(id).await? {
            return Err(ApiError::UserNotFound);
        }

        for movie_id in reviewed_movies {
            refresh_movie_rating(self.store.as_ref(), movie_id).await?;
        }

        tracing::info!(user_id = id, deleted_by = actor.id, "User deleted");
        Ok(())
    }

    // ========== Password reset ==========

    /// Issue a reset token and email the link in the background.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        let user = self
            .store
            .user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::EmailNotFound(email.to_string()))?;

        if let Some(existing) = self.store.reset_token_for_user(user.id).await? {
            if !existing.is_expired() {
                return Err(ApiError::UserAlreadyHasPasswordResetToken);
            }
            self.store.delete_reset_token(existing.id).await?;
        }

        let (raw_token, token_hash) = generate_token();
        let expires_at = Utc::now() + Duration::minutes(self.config.reset_token_ttl_minutes);
        self.store
            .insert_reset_token(user.id, &token_hash, expires_at)
            .await?;

        let reset_link = format!(
            "{}/signin/password/reset?passwordResetToken={}",
            self.config.client_host.trim_end_matches('/'),
            raw_token
        );
        let body = render_password_reset(
            &user.username,
            &reset_link,
            self.config.reset_token_ttl_minutes,
        );

        let mailer = self.mailer.clone();
        let to = user.email.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, PASSWORD_RESET_SUBJECT, &body).await {
                tracing::error!(
                    error = ?e,
                    to = %anonymize_email(&to),
                    "Failed to send password reset email"
                );
            }
        });

        tracing::info!(
            user_id = user.id,
            email = %anonymize_email(&user.email),
            "Password reset requested"
        );
        Ok(())
    }

    /// Consume a reset token and set the new password.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<()> {
        request.validate()?;

        let token = self
            .store
            .reset_token_by_hash(&hash_token(&request.password_reset_token))
            .await?
            .ok_or(ApiError::InvalidPasswordResetToken)?;

        if token.is_expired() {
            self.store.delete_reset_token(token.id).await?;
            return Err(ApiError::InvalidPasswordResetToken);
        }

        let mut user = self
            .store
            .user_by_id(token.user_id)
            .await?
            .ok_or(ApiError::InvalidPasswordResetToken)?;
        user.password_hash = hash_password(&request.new_password)?;
        self.store.update_user(&user).await?;
        self.store.delete_reset_token(token.id).await?;

        tracing::info!(user_id = user.id, "Password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::tests::test_jwt;
    use crate::services::auth::verify_password;
    use crate::services::email::testing::RecordingMailer;
    use crate::services::test_support::{create_user, movie, store};

    struct Fixture {
        store: Arc<dyn Store>,
        mailer: Arc<RecordingMailer>,
        service: UserService,
    }

    fn fixture() -> Fixture {
        let store = store();
        let mailer = Arc::new(RecordingMailer::default());
        let service = UserService::new(
            store.clone(),
            Arc::new(test_jwt()),
            mailer.clone(),
            UserServiceConfig {
                client_host: "http://client.test/".to_string(),
                reset_token_ttl_minutes: 15,
            },
        );
        Fixture {
            store,
            mailer,
            service,
        }
    }

    fn register_request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password: "password123".to_string(),
        }
    }

    fn raw_token_from(body: &str) -> String {
        body.split("passwordResetToken=")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_defaults_role() {
        let f = fixture();
        let dto = f.service.register(&register_request("alice")).await.unwrap();
        assert_eq!(dto.role, Role::User);

        let stored = f.store.user_by_id(dto.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(verify_password("password123", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email_and_username() {
        let f = fixture();
        f.service.register(&register_request("alice")).await.unwrap();

        let mut same_email = register_request("other");
        same_email.email = "alice@example.com".to_string();
        assert!(matches!(
            f.service.register(&same_email).await,
            Err(ApiError::EmailTaken(_))
        ));

        let mut same_name = register_request("alice");
        same_name.email = "new@example.com".to_string();
        assert!(matches!(
            f.service.register(&same_name).await,
            Err(ApiError::UsernameTaken(_))
        ));
    }

    #[tokio::test]
    async fn test_lookups() {
        let f = fixture();
        f.service.register(&register_request("alice")).await.unwrap();

        assert_eq!(
            f.service.find_by_username("alice").await.unwrap().email,
            "alice@example.com"
        );
        assert!(f.service.find_by_email("alice@example.com").await.is_ok());
        assert!(matches!(
            f.service.find_by_username("nobody").await,
            Err(ApiError::UserNotFound)
        ));
        assert_eq!(f.service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_user_only_self_and_unique() {
        let f = fixture();
        let alice = create_user(&f.store, "alice", Role::User).await;
        let bob = create_user(&f.store, "bobby", Role::User).await;

        let request = UpdateUserRequest {
            username: "alice2".to_string(),
            email: "alice2@example.com".to_string(),
            profile_picture: Some("https://img/new.png".to_string()),
        };
        assert!(matches!(
            f.service.update_user(&bob, alice.id, &request).await,
            Err(ApiError::Unauthorized(_))
        ));

        let taken = UpdateUserRequest {
            username: "alice".to_string(),
            email: "bobby@example.com".to_string(),
            profile_picture: None,
        };
        assert!(matches!(
            f.service.update_user(&alice, alice.id, &taken).await,
            Err(ApiError::EmailTaken(_))
        ));

        let tokens = f.service.update_user(&alice, alice.id, &request).await.unwrap();
        assert!(!tokens.access_token.is_empty());
        let stored = f.store.user_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.username, "alice2");
        assert_eq!(stored.profile_picture.as_deref(), Some("https://img/new.png"));
    }

    #[tokio::test]
    async fn test_update_user_keeps_picture_when_omitted() {
        let f = fixture();
        let mut alice = create_user(&f.store, "alice", Role::User).await;
        alice.profile_picture = Some("https://img/a.png".to_string());
        f.store.update_user(&alice).await.unwrap();

        let request = UpdateUserRequest {
            username: "alice".to_string(),
            email: "alice.new@example.com".to_string(),
            profile_picture: None,
        };
        f.service.update_user(&alice, alice.id, &request).await.unwrap();

        let stored = f.store.user_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "alice.new@example.com");
        assert_eq!(stored.profile_picture.as_deref(), Some("https://img/a.png"));
    }

    #[tokio::test]
    async fn test_update_role_and_ban() {
        let f = fixture();
        let alice = create_user(&f.store, "alice", Role::User).await;

        f.service.update_role(alice.id, "role_mod").await.unwrap();
        assert!(f.service.find_by_id(alice.id).await.unwrap().is_moderator());

        f.service.update_role(alice.id, "anything").await.unwrap();
        assert_eq!(f.service.find_by_id(alice.id).await.unwrap().role, Role::User);

        f.service.set_banned(alice.id, true).await.unwrap();
        assert!(f.service.find_by_id(alice.id).await.unwrap().banned);
        assert!(matches!(
            f.service.set_banned(999, true).await,
            Err(ApiError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_user_rules() {
        let f = fixture();
        let alice = create_user(&f.store, "alice", Role::User).await;
        let bob = create_user(&f.store, "bobby", Role::User).await;
        let moderator = create_user(&f.store, "moderator", Role::Mod).await;

        assert!(matches!(
            f.service.delete_user(&bob, alice.id).await,
            Err(ApiError::Forbidden(_))
        ));
        f.service.delete_user(&moderator, alice.id).await.unwrap();
        assert!(matches!(
            f.service.delete_user(&moderator, alice.id).await,
            Err(ApiError::UserNotFound)
        ));
        f.service.delete_user(&bob, bob.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_user_refreshes_movie_rating() {
        let f = fixture();
        let alice = create_user(&f.store, "alice", Role::User).await;
        f.store.upsert_movie(&movie(1, "Heat")).await.unwrap();
        let item = f.store.insert_user_movie(alice.id, 1).await.unwrap();
        f.store
            .insert_review(&crate::services::store::CreateReviewParams {
                user_movie_id: item.id,
                rating: 9.0,
                comment: "",
                review_date: Utc::now(),
            })
            .await
            .unwrap();
        f.store.set_movie_avg_rating(1, Some(9.0)).await.unwrap();

        f.service.delete_user(&alice, alice.id).await.unwrap();
        let movie = f.store.movie_by_id(1).await.unwrap().unwrap();
        assert_eq!(movie.mm_avg_rating, None);
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let f = fixture();
        f.service.register(&register_request("alice")).await.unwrap();

        f.service
            .request_password_reset("alice@example.com")
            .await
            .unwrap();

        let sent = f.mailer.wait_for(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].subject, PASSWORD_RESET_SUBJECT);
        assert!(sent[0]
            .body
            .contains("http://client.test/signin/password/reset?passwordResetToken="));

        assert!(matches!(
            f.service.request_password_reset("alice@example.com").await,
            Err(ApiError::UserAlreadyHasPasswordResetToken)
        ));

        let token = raw_token_from(&sent[0].body);
        f.service
            .reset_password(&ResetPasswordRequest {
                password_reset_token: token.clone(),
                new_password: "new-password".to_string(),
            })
            .await
            .unwrap();

        let user = f.store.user_by_username("alice").await.unwrap().unwrap();
        assert!(verify_password("new-password", &user.password_hash));

        assert!(matches!(
            f.service
                .reset_password(&ResetPasswordRequest {
                    password_reset_token: token,
                    new_password: "another-password".to_string(),
                })
                .await,
            Err(ApiError::InvalidPasswordResetToken)
        ));
    }

    #[tokio::test]
    async fn test_password_reset_unknown_email() {
        let f = fixture();
        assert!(matches!(
            f.service.request_password_reset("ghost@example.com").await,
            Err(ApiError::EmailNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_reset_token_is_replaced() {
        let f = fixture();
        let alice = create_user(&f.store, "alice", Role::User).await;
        f.store
            .insert_reset_token(alice.id, "old-hash", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();

        f.service
            .request_password_reset("alice@example.com")
            .await
            .unwrap();

        assert!(f.store.reset_token_by_hash("old-hash").await.unwrap().is_none());
        assert!(f.store.reset_token_for_user(alice.id).await.unwrap().is_some());
    }
}
