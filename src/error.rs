// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Domain error type shared by services and route handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found")]
    UserNotFound,
    #[error("No user found with email {0}")]
    EmailNotFound(String),
    #[error("Email {0} has already been taken")]
    EmailTaken(String),
    #[error("Username {0} has already been taken")]
    UsernameTaken(String),
    #[error("Bad credentials")]
    BadCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Movie not found")]
    MovieNotFound,
    #[error("Movie with title {0} already exists")]
    DuplicateMovie(String),
    #[error("Genre {0} not found")]
    GenreNotFound(String),
    #[error("Genres have not been loaded")]
    GenresNotLoaded,
    #[error("Movie is not in the user's watchlist")]
    MovieNotInWatchlist,
    #[error("Watchlist item not found")]
    UserMovieNotFound,
    #[error("Movie is already in the user's watchlist")]
    AlreadyInWatchlist,
    #[error("Review not found")]
    ReviewNotFound,
    #[error("Friendship already exists")]
    FriendshipAlreadyExists,
    #[error("Friendship not found")]
    FriendshipNotFound,
    #[error("You cannot befriend yourself")]
    CannotFriendSelf,
    #[error("Topic not found")]
    TopicNotFound,
    #[error("Report not found")]
    ReportNotFound,
    #[error("User already has a valid password reset token")]
    UserAlreadyHasPasswordResetToken,
    #[error("Invalid or expired password reset token")]
    InvalidPasswordResetToken,
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Default HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound
            | ApiError::EmailNotFound(_)
            | ApiError::MovieNotFound
            | ApiError::GenreNotFound(_)
            | ApiError::GenresNotLoaded
            | ApiError::UserMovieNotFound
            | ApiError::ReviewNotFound
            | ApiError::TopicNotFound
            | ApiError::ReportNotFound => StatusCode::NOT_FOUND,
            ApiError::BadCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::EmailTaken(_)
            | ApiError::UsernameTaken(_)
            | ApiError::DuplicateMovie(_)
            | ApiError::MovieNotInWatchlist
            | ApiError::AlreadyInWatchlist
            | ApiError::FriendshipAlreadyExists
            | ApiError::FriendshipNotFound
            | ApiError::CannotFriendSelf
            | ApiError::UserAlreadyHasPasswordResetToken
            | ApiError::InvalidPasswordResetToken
            | ApiError::BadRequest(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Build the response with an explicit status instead of the default one.
    /// Auth failures and infrastructure failures keep their own status.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        let status = match self {
            ApiError::Internal(_)
            | ApiError::Unauthorized(_)
            | ApiError::Forbidden(_)
            | ApiError::BadCredentials => self.status(),
            _ => status,
        };
        (status, Json(self.body())).into_response()
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => ErrorResponse {
                success: false,
                message: self.to_string(),
                errors: Some(errors.clone()),
            },
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Request failed with internal error");
                ErrorResponse {
                    success: false,
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            _ => ErrorResponse {
                success: false,
                message: self.to_string(),
                errors: None,
            },
        }
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.into_response_with(status)
    }
}

/// Rejection for endpoints that answer every domain failure with 406.
#[derive(Debug)]
pub struct NotAcceptable(pub ApiError);

impl From<ApiError> for NotAcceptable {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for NotAcceptable {
    fn into_response(self) -> Response {
        self.0.into_response_with(StatusCode::NOT_ACCEPTABLE)
    }
}

/// Collects validation failures and turns them into a single error.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` when `failed` is true.
    pub fn check(&mut self, failed: bool, message: &str) -> &mut Self {
        if failed {
            self.0.push(message.to_string());
        }
        self
    }

    pub fn into_result(self) -> ApiResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::GenresNotLoaded.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("no".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::EmailTaken("a@b.c".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::CannotFriendSelf.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::UsernameTaken("alice".to_string()).to_string(),
            "Username alice has already been taken"
        );
        assert_eq!(
            ApiError::EmailTaken("a@b.c".to_string()).to_string(),
            "Email a@b.c has already been taken"
        );
    }

    #[tokio::test]
    async fn test_validation_body_lists_errors() {
        let response = ApiError::Validation(vec!["Email is invalid".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0], "Email is invalid");
    }

    #[test]
    fn test_not_acceptable_keeps_auth_and_internal_statuses() {
        let response = NotAcceptable(ApiError::MovieNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

        let response = NotAcceptable(ApiError::Forbidden("no".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = NotAcceptable(ApiError::Internal(anyhow::anyhow!("db down"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_violations() {
        let mut v = Violations::new();
        v.check(false, "fine").check(true, "Title cannot be blank");
        match v.into_result() {
            Err(ApiError::Validation(errors)) => assert_eq!(errors, vec!["Title cannot be blank"]),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(Violations::new().into_result().is_ok());
    }
}
