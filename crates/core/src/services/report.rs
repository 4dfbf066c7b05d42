//! Report service.

use chrono::Utc;
use civita_common::{AppError, AppResult, IdGenerator, StoredFile};
use civita_db::{
    entities::{
        notification::NotificationType,
        report,
        report::ReportStatus,
        user::{self, UserRole},
    },
    repositories::{ReportRepository, UserProfileRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::notification::NotificationService;

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    profile_repo: UserProfileRepository,
    notifications: Option<NotificationService>,
    id_gen: IdGenerator,
}

/// Input for filing a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    #[validate(length(min = 1, max = 64))]
    pub crime_type: String,

    #[validate(length(min = 1, max = 10_000))]
    pub description: String,

    #[validate(length(min = 1, max = 256))]
    pub location: String,

    /// Free-form nested details (peopleInvolved, weapons, dangerLevel, ...)
    pub details: Option<serde_json::Value>,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub fn new(report_repo: ReportRepository, profile_repo: UserProfileRepository) -> Self {
        Self {
            report_repo,
            profile_repo,
            notifications: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification service.
    pub fn set_notifications(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    /// File a new report.
    ///
    /// The reporter's address is snapshotted onto the report at submission
    /// time; later profile edits do not move old reports between scopes.
    pub async fn create(
        &self,
        reporter: &user::Model,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        let reporter_address = self
            .profile_repo
            .find_by_user_id(&reporter.id)
            .await?
            .and_then(|p| p.address)
            .unwrap_or_else(|| input.location.clone());

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter.id.clone()),
            crime_type: Set(input.crime_type),
            description: Set(input.description),
            location: Set(input.location),
            reporter_address: Set(reporter_address),
            status: Set(ReportStatus::Pending),
            police_id: Set(None),
            valid_count: Set(0),
            invalid_count: Set(0),
            details: Set(input.details),
            attachments: Set(serde_json::json!([])),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.report_repo.create(model).await
    }

    /// Get a report by ID.
    pub async fn get(&self, id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// List reports, newest first.
    pub async fn list(&self, limit: u64, until_id: Option<&str>) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_recent(limit, until_id).await
    }

    /// List reports filed by a user.
    pub async fn list_by_reporter(
        &self,
        reporter_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo
            .find_by_reporter(reporter_id, limit, until_id)
            .await
    }

    /// List case files assigned to an officer.
    pub async fn list_by_officer(&self, police_id: &str) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_officer(police_id).await
    }

    /// Record an uploaded attachment on a report. Only the reporter may
    /// attach files.
    pub async fn add_attachment(
        &self,
        actor: &user::Model,
        report_id: &str,
        file: &StoredFile,
    ) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(report_id).await?;

        if report.reporter_id != actor.id {
            return Err(AppError::Forbidden("Not your report".to_string()));
        }

        let mut attachments = report.attachments.clone();
        if let Some(list) = attachments.as_array_mut() {
            list.push(serde_json::json!({
                "url": file.url,
                "contentType": file.content_type,
                "size": file.size,
            }));
        }

        let mut active: report::ActiveModel = report.into();
        active.attachments = Set(attachments);
        active.updated_at = Set(Some(Utc::now().into()));

        self.report_repo.update(active).await
    }

    /// Change a report's status. Restricted to police and admin actors.
    pub async fn update_status(
        &self,
        actor: &user::Model,
        report_id: &str,
        status: ReportStatus,
    ) -> AppResult<report::Model> {
        if actor.role == UserRole::Citizen {
            return Err(AppError::RoleMismatch("police".to_string()));
        }

        let report = self.report_repo.get_by_id(report_id).await?;
        let reporter_id = report.reporter_id.clone();

        let mut active: report::ActiveModel = report.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.report_repo.update(active).await?;

        if let Some(notifications) = &self.notifications
            && let Err(e) = notifications
                .notify(
                    &reporter_id,
                    Some(&actor.id),
                    NotificationType::StatusChanged,
                    Some(report_id),
                    Some(format!(
                        "Your report status changed to {}",
                        format!("{status:?}").to_lowercase()
                    )),
                )
                .await
        {
            tracing::warn!(error = %e, "Failed to create status notification");
        }

        Ok(updated)
    }

    /// Claim an unassigned report for an officer.
    ///
    /// The claim is an atomic conditional update on the database; losing a
    /// race returns a conflict, an expected handled outcome rather than an
    /// exceptional error.
    pub async fn take_case(
        &self,
        officer: &user::Model,
        report_id: &str,
    ) -> AppResult<report::Model> {
        if officer.role != UserRole::Police {
            return Err(AppError::RoleMismatch("police".to_string()));
        }

        // Verify the report exists before attempting the claim, so a
        // missing id maps to 404 rather than 409.
        let report = self.report_repo.get_by_id(report_id).await?;

        if !self.report_repo.claim_case(report_id, &officer.id).await? {
            return Err(AppError::Conflict(
                "Case already assigned to another officer".to_string(),
            ));
        }

        if let Some(notifications) = &self.notifications
            && let Err(e) = notifications
                .notify(
                    &report.reporter_id,
                    Some(&officer.id),
                    NotificationType::CaseTaken,
                    Some(report_id),
                    Some("An officer has taken your case".to_string()),
                )
                .await
        {
            tracing::warn!(error = %e, "Failed to create case-taken notification");
        }

        self.report_repo.get_by_id(report_id).await
    }

    /// Delete a report. Admin only.
    pub async fn delete(&self, actor: &user::Model, report_id: &str) -> AppResult<()> {
        if actor.role != UserRole::Admin {
            return Err(AppError::RoleMismatch("admin".to_string()));
        }

        // 404 if it never existed
        self.report_repo.get_by_id(report_id).await?;
        self.report_repo.delete(report_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn officer(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("officer-{id}"),
            username_lower: format!("officer-{id}"),
            role: UserRole::Police,
            token: None,
            name: None,
            is_suspended: false,
            points: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn citizen(id: &str) -> user::Model {
        user::Model {
            role: UserRole::Citizen,
            ..officer(id)
        }
    }

    fn test_report(id: &str, police_id: Option<&str>) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: "reporter1".to_string(),
            crime_type: "theft".to_string(),
            description: "Stolen bicycle".to_string(),
            location: "Dhaka-Mirpur".to_string(),
            reporter_address: "Dhaka-Mirpur".to_string(),
            status: ReportStatus::Pending,
            police_id: police_id.map(String::from),
            valid_count: 0,
            invalid_count: 0,
            details: None,
            attachments: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_take_case_rejects_citizen() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = ReportService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(db),
        );

        let result = service.take_case(&citizen("c1"), "r1").await;
        assert!(matches!(result, Err(AppError::RoleMismatch(_))));
    }

    #[tokio::test]
    async fn test_take_case_conflict_when_already_claimed() {
        // Lookup finds the report, but the conditional claim updates zero rows
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_report("r1", Some("other-officer"))]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = ReportService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(db),
        );

        let result = service.take_case(&officer("o1"), "r1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_take_case_success() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![test_report("r1", None)],
                    vec![test_report("r1", Some("o1"))],
                ])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let service = ReportService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(db),
        );

        let claimed = service.take_case(&officer("o1"), "r1").await.unwrap();
        assert_eq!(claimed.police_id.as_deref(), Some("o1"));
    }

    #[tokio::test]
    async fn test_update_status_rejects_citizen() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = ReportService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(db),
        );

        let result = service
            .update_status(&citizen("c1"), "r1", ReportStatus::Resolved)
            .await;
        assert!(matches!(result, Err(AppError::RoleMismatch(_))));
    }
}
