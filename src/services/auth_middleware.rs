// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Bearer token extractors for Axum.
//!
//! - `AuthUser`: any signed-in user with a valid access token
//! - `RequireModerator`: same, but the user must hold `ROLE_MOD`
//! - `AuthError`: rejection returned when either check fails

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::user::User;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Auth error responses.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InsufficientPermissions,
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Authentication is required to access this resource",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Invalid or expired jwt",
            ),
            AuthError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You do not have permission to access this resource",
            ),
            AuthError::InternalError(msg) => {
                tracing::error!(error = %msg, "Auth internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Internal server error",
                )
            }
        };
        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        match state.auth.authenticate(token).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(ApiError::Internal(e)) => Err(AuthError::InternalError(e.to_string())),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                Err(AuthError::InvalidToken)
            }
        }
    }
}

/// The authenticated caller, who must be a moderator.
pub struct RequireModerator(pub User);

impl FromRequestParts<AppState> for RequireModerator {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_moderator() {
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(RequireModerator(user))
    }
}
