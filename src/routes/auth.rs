// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication route handlers.

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::auth::{LoginRequest, RefreshRequest, TokenResponse};
use crate::routes::extract::ApiJson;
use axum::{extract::State, routing::post, Json, Router};

/// Create auth router with the public token endpoints.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
}

/// POST /auth/login - Exchange credentials for an access and refresh token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Bad credentials or banned account")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    payload.validate()?;
    let pair = state
        .auth
        .login(payload.username.trim(), &payload.password)
        .await?;
    Ok(Json(pair.into()))
}

/// POST /auth/refresh - Issue a new access token from a refresh token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    payload.validate()?;
    let access_token = state.auth.refresh(payload.jwt.trim()).await?;
    Ok(Json(TokenResponse {
        access_token,
        refresh_token: None,
    }))
}
