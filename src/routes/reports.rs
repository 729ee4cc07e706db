// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User reports. Reading and closing reports is for moderators.

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::auth::MessageResponse;
use crate::models::report::{CreateReportRequest, ReportDto, ReportQuery};
use crate::routes::extract::{ApiJson, ApiQuery};
use crate::services::auth_middleware::{AuthUser, RequireModerator};
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn reports_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(report_handler)
                .post(create_report_handler)
                .delete(delete_report_handler),
        )
        .route("/all", get(list_reports_handler))
}

/// POST /reports - Report a user.
#[utoipa::path(
    post,
    path = "/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Created", body = ReportDto),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn create_report_handler(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(payload): ApiJson<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<ReportDto>)> {
    payload.validate()?;
    let report = state
        .reports
        .create(&actor, payload.user_id, payload.reason.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /reports/all - All reports.
#[utoipa::path(
    get,
    path = "/reports/all",
    responses(
        (status = 200, description = "Reports", body = [ReportDto]),
        (status = 403, description = "Moderator only")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn list_reports_handler(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
) -> ApiResult<Json<Vec<ReportDto>>> {
    Ok(Json(state.reports.all().await?))
}

/// GET /reports - One report.
#[utoipa::path(
    get,
    path = "/reports",
    params(
        ("reportId" = i64, Query, description = "Report id")
    ),
    responses(
        (status = 200, description = "The report", body = ReportDto),
        (status = 403, description = "Moderator only"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn report_handler(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> ApiResult<Json<ReportDto>> {
    Ok(Json(state.reports.get(query.report_id).await?))
}

/// DELETE /reports - Close a report, optionally banning the user.
#[utoipa::path(
    delete,
    path = "/reports",
    params(
        ("reportId" = i64, Query, description = "Report id"),
        ("banUser" = Option<bool>, Query, description = "Also ban the reported user")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Moderator only"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn delete_report_handler(
    State(state): State<AppState>,
    RequireModerator(moderator): RequireModerator,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .reports
        .delete(query.report_id, query.ban_user)
        .await?;
    tracing::info!(
        report_id = query.report_id,
        moderator_id = moderator.id,
        ban_user = query.ban_user,
        "Report closed"
    );
    Ok(Json(MessageResponse::ok("Report deleted successfully")))
}
