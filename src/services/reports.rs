// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User reports and the moderation queue.

use crate::error::{ApiError, ApiResult};
use crate::models::report::{Report, ReportDto};
use crate::models::user::{User, UserDto};
use crate::services::store::Store;
use anyhow::anyhow;
use std::sync::Arc;

pub struct ReportService {
    store: Arc<dyn Store>,
}

impl ReportService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        reporter: &User,
        reported_user_id: i64,
        reason: &str,
    ) -> ApiResult<ReportDto> {
        let reported = self
            .store
            .user_by_id(reported_user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let report = self.store.insert_report(reported.id, reason).await?;
        tracing::info!(
            report_id = report.id,
            reported_user_id = reported.id,
            reporter_id = reporter.id,
            "User reported"
        );
        Ok(ReportDto {
            id: report.id,
            reported_user: UserDto::from(&reported),
            reason: report.reason,
        })
    }

    pub async fn all(&self) -> ApiResult<Vec<ReportDto>> {
        let reports = self.store.list_reports().await?;
        let mut dtos = Vec::with_capacity(reports.len());
        for report in reports {
            dtos.push(self.to_dto(report).await?);
        }
        Ok(dtos)
    }

    pub async fn get(&self, id: i64) -> ApiResult<ReportDto> {
        let report = self
            .store
            .report_by_id(id)
            .await?
            .ok_or(ApiError::ReportNotFound)?;
        self.to_dto(report).await
    }

    /// Close a report, optionally banning the reported user.
    pub async fn delete(&self, id: i64, ban_user: bool) -> ApiResult<()> {
        let report = self
            .store
            .report_by_id(id)
            .await?
            .ok_or(ApiError::ReportNotFound)?;

        if ban_user {
            if let Some(mut user) = self.store.user_by_id(report.reported_user_id).await? {
                user.banned = true;
                self.store.update_user(&user).await?;
                tracing::info!(user_id = user.id, report_id = id, "User banned from report");
            }
        }

        self.store.delete_report(id).await?;
        Ok(())
    }

    async fn to_dto(&self, report: Report) -> ApiResult<ReportDto> {
        let reported = self
            .store
            .user_by_id(report.reported_user_id)
            .await?
            .ok_or_else(|| anyhow!("Report {} references missing user", report.id))?;
        Ok(ReportDto {
            id: report.id,
            reported_user: UserDto::from(&reported),
            reason: report.reason,
        })
    }
}
