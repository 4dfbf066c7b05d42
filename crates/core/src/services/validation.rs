//! Validation vote service.

use chrono::Utc;
use civita_common::{AppError, AppResult, IdGenerator};
use civita_db::{
    entities::{
        notification::NotificationType,
        user::{self, UserRole},
        validation,
    },
    repositories::{ReportRepository, UserRepository, ValidationRepository},
};
use sea_orm::Set;
use serde::Serialize;

use crate::services::notification::NotificationService;

/// Reward-point delta a police vote applies to the reporter. Positive for
/// a confirming vote, negative for a disputing one. Citizen votes carry no
/// weight.
pub const POLICE_POINTS_ADJUSTMENT: i32 = 200;

/// Aggregated vote counts for a report, including the caller's own vote.
///
/// `my_vote` is server truth; clients render voting controls from it
/// rather than reconstructing prior votes from local state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    pub confirmed: u64,
    pub disputed: u64,
    pub total: u64,
    /// `Some(true)` = confirmed, `Some(false)` = disputed, `None` = not voted
    pub my_vote: Option<bool>,
}

/// Validation service for business logic.
#[derive(Clone)]
pub struct ValidationService {
    validation_repo: ValidationRepository,
    report_repo: ReportRepository,
    user_repo: UserRepository,
    notifications: Option<NotificationService>,
    id_gen: IdGenerator,
}

impl ValidationService {
    /// Create a new validation service.
    #[must_use]
    pub fn new(
        validation_repo: ValidationRepository,
        report_repo: ReportRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            validation_repo,
            report_repo,
            user_repo,
            notifications: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification service.
    pub fn set_notifications(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    /// Cast a vote on a report.
    ///
    /// One vote per user per report; duplicates are rejected with a
    /// conflict. Counts on the report row are recomputed from the
    /// validation table after the insert, never adjusted client-side.
    pub async fn cast(
        &self,
        voter: &user::Model,
        report_id: &str,
        is_valid: bool,
    ) -> AppResult<validation::Model> {
        let report = self.report_repo.get_by_id(report_id).await?;

        if report.reporter_id == voter.id {
            return Err(AppError::BadRequest(
                "Cannot validate your own report".to_string(),
            ));
        }

        if self.validation_repo.has_voted(&voter.id, report_id).await? {
            return Err(AppError::Conflict(
                "Already voted on this report".to_string(),
            ));
        }

        let points_adjustment = if voter.role == UserRole::Police {
            if is_valid {
                POLICE_POINTS_ADJUSTMENT
            } else {
                -POLICE_POINTS_ADJUSTMENT
            }
        } else {
            0
        };

        let model = validation::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report_id.to_string()),
            user_id: Set(voter.id.clone()),
            is_valid: Set(is_valid),
            points_adjustment: Set(points_adjustment),
            created_at: Set(Utc::now().into()),
        };

        let vote = self.validation_repo.create(model).await?;

        if points_adjustment != 0 {
            self.user_repo
                .adjust_points(&report.reporter_id, points_adjustment)
                .await?;
        }

        // Recompute denormalized tallies from the source of truth
        let (confirmed, disputed) = self.validation_repo.count_by_report(report_id).await?;
        self.report_repo
            .set_vote_counts(report_id, confirmed as i64, disputed as i64)
            .await?;

        if let Some(notifications) = &self.notifications
            && let Err(e) = notifications
                .notify(
                    &report.reporter_id,
                    Some(&voter.id),
                    NotificationType::ReportValidated,
                    Some(report_id),
                    Some(if is_valid {
                        "Your report was confirmed".to_string()
                    } else {
                        "Your report was disputed".to_string()
                    }),
                )
                .await
        {
            tracing::warn!(error = %e, "Failed to create validation notification");
        }

        Ok(vote)
    }

    /// Aggregate vote counts for a report, with the caller's own vote.
    pub async fn summary(&self, report_id: &str, viewer_id: &str) -> AppResult<VoteSummary> {
        // 404 for unknown reports
        self.report_repo.get_by_id(report_id).await?;

        let (confirmed, disputed) = self.validation_repo.count_by_report(report_id).await?;
        let my_vote = self
            .validation_repo
            .find_by_user_and_report(viewer_id, report_id)
            .await?
            .map(|v| v.is_valid);

        Ok(VoteSummary {
            confirmed,
            disputed,
            total: confirmed + disputed,
            my_vote,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use civita_db::entities::report::{self, ReportStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn voter(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            username_lower: id.to_string(),
            role,
            token: None,
            name: None,
            is_suspended: false,
            points: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_report(id: &str, reporter_id: &str) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: reporter_id.to_string(),
            crime_type: "robbery".to_string(),
            description: "Armed robbery".to_string(),
            location: "Dhaka-Mirpur".to_string(),
            reporter_address: "Dhaka-Mirpur".to_string(),
            status: ReportStatus::Active,
            police_id: None,
            valid_count: 0,
            invalid_count: 0,
            details: None,
            attachments: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_vote(id: &str, user_id: &str, report_id: &str, is_valid: bool) -> validation::Model {
        validation::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            user_id: user_id.to_string(),
            is_valid,
            points_adjustment: 0,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> ValidationService {
        ValidationService::new(
            ValidationRepository::new(Arc::clone(&db)),
            ReportRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_cast_rejects_duplicate_vote() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_report("r1", "reporter1")]])
                .append_query_results([vec![test_vote("v1", "u1", "r1", true)]])
                .into_connection(),
        );

        let result = service(db)
            .cast(&voter("u1", UserRole::Citizen), "r1", true)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cast_rejects_own_report() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_report("r1", "u1")]])
                .into_connection(),
        );

        let result = service(db)
            .cast(&voter("u1", UserRole::Citizen), "r1", true)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_summary_reports_counts_and_own_vote() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // report lookup
                .append_query_results([vec![test_report("r1", "reporter1")]])
                // confirmed count, disputed count
                .append_query_results([
                    vec![maplit_count(3)],
                    vec![maplit_count(1)],
                ])
                // viewer's own vote
                .append_query_results([vec![test_vote("v9", "u1", "r1", false)]])
                .into_connection(),
        );

        let summary = service(db).summary("r1", "u1").await.unwrap();

        assert_eq!(summary.confirmed, 3);
        assert_eq!(summary.disputed, 1);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.my_vote, Some(false));
    }

    /// Row shape returned by `PaginatorTrait::count`.
    fn maplit_count(n: i64) -> std::collections::BTreeMap<String, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items".to_string(), sea_orm::Value::BigInt(Some(n)));
        row
    }
}
