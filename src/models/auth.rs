// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{ApiResult, Violations};
use crate::models::user::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// JWT Claims
// ============================================================================

/// Distinguishes short-lived access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by every issued token. `sub` is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub role: Role,
    pub profile_url: Option<String>,
    pub typ: TokenType,
    pub iat: i64,
    pub exp: i64,
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(self.username.trim().is_empty(), "Please enter a username")
            .check(self.password.trim().is_empty(), "Please enter a password");
        v.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub jwt: String,
}

impl RefreshRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let mut v = Violations::new();
        v.check(self.jwt.trim().is_empty(), "Refresh token is required");
        v.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Generic message response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_use_camel_case() {
        let claims = Claims {
            sub: "alice".to_string(),
            user_id: 7,
            role: Role::User,
            profile_url: None,
            typ: TokenType::Refresh,
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["role"], "ROLE_USER");
        assert_eq!(json["typ"], "refresh");
        assert!(json.get("profileUrl").is_some());
    }

    #[test]
    fn test_token_response_omits_missing_refresh() {
        let response = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"accessToken":"a"}"#);
    }

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            username: " ".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
