// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{ApiResult, Violations};
use chrono::{DateTime, NaiveDate, Utc};
use lettre::Address;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_USERNAME_LEN: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Role
// ============================================================================

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_MOD")]
    Mod,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Mod => "ROLE_MOD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ROLE_USER" => Some(Role::User),
            "ROLE_MOD" => Some(Role::Mod),
            _ => None,
        }
    }

    /// Role requested through the role update endpoint.
    /// Anything that is not `ROLE_MOD` (ignoring case) demotes to a regular user.
    pub fn from_request(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case(Role::Mod.as_str()) {
            Role::Mod
        } else {
            Role::User
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or_else(|| format!("Unknown role: {value}"))
    }
}

// ============================================================================
// Database Models
// ============================================================================

/// User record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub date_joined: NaiveDate,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub enabled: bool,
    pub banned: bool,
}

impl User {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Mod
    }

    /// Disabled and banned accounts cannot sign in.
    pub fn can_sign_in(&self) -> bool {
        self.enabled && !self.banned
    }
}

/// Single-use password reset token; only the SHA-256 hash is stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub profile_picture: Option<String>,
    pub date_joined: NaiveDate,
    pub role: Role,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            profile_picture: user.profile_picture.clone(),
            date_joined: user.date_joined,
            role: user.role,
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    email.parse::<Address>().is_ok()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(self.email.trim().is_empty(), "Please enter an email")
            .check(
                !self.email.trim().is_empty() && !is_valid_email(&self.email),
                "Invalid email",
            )
            .check(
                self.username.chars().count() < MIN_USERNAME_LEN,
                "Username needs to be at least 5 characters long",
            )
            .check(
                self.password.chars().count() < MIN_PASSWORD_LEN,
                "Password needs to be at least 8 characters long",
            );
        v.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(
            self.username.chars().count() < MIN_USERNAME_LEN,
            "Username needs to be at least 5 characters long",
        )
        .check(self.email.trim().is_empty(), "Please enter an email")
        .check(
            !self.email.trim().is_empty() && !is_valid_email(&self.email),
            "Invalid email",
        );
        v.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct BanStatusQuery {
    pub banned: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BanStatusResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub banned_status: bool,
    pub user_object: UserDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

impl PasswordResetRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(
            self.email.trim().is_empty(),
            "Please enter the email that you use for signing in",
        );
        v.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password_reset_token: String,
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(
            self.password_reset_token.trim().is_empty(),
            "Please enter your password reset token",
        )
        .check(
            self.new_password.chars().count() < MIN_PASSWORD_LEN,
            "Password needs to be at least 8 characters long",
        );
        v.into_result()
    }
}
