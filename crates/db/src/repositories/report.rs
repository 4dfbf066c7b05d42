//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report, report::ReportStatus};
use chrono::{DateTime, Utc};
use civita_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReportNotFound(id.to_string()))
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a report.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if let Some(r) = self.find_by_id(id).await? {
            r.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List reports, newest first (paginated).
    pub async fn find_recent(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find().order_by_desc(report::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(report::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reports by reporter, newest first (paginated).
    pub async fn find_by_reporter(
        &self,
        reporter_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .order_by_desc(report::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(report::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reports created at or after `cutoff`, newest first.
    ///
    /// Used by the alert views: only reports still inside the visibility
    /// window can be active alerts, so older rows are excluded in SQL.
    pub async fn find_created_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::CreatedAt.gte(cutoff))
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reports assigned to an officer, newest first.
    pub async fn find_by_officer(&self, police_id: &str) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::PoliceId.eq(police_id))
            .order_by_desc(report::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically claim an unassigned report for an officer.
    ///
    /// Compare-and-swap on `police_id IS NULL`: returns `false` when the
    /// report was already claimed (zero rows updated), so concurrent claims
    /// cannot both succeed.
    pub async fn claim_case(&self, report_id: &str, police_id: &str) -> AppResult<bool> {
        let result = Report::update_many()
            .col_expr(report::Column::PoliceId, Expr::value(police_id))
            .col_expr(
                report::Column::Status,
                Expr::value(ReportStatus::Investigating.to_value()),
            )
            .col_expr(report::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(report::Column::Id.eq(report_id))
            .filter(report::Column::PoliceId.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// Persist recomputed vote tallies onto the report row.
    pub async fn set_vote_counts(
        &self,
        report_id: &str,
        valid_count: i64,
        invalid_count: i64,
    ) -> AppResult<()> {
        Report::update_many()
            .col_expr(report::Column::ValidCount, Expr::value(valid_count))
            .col_expr(report::Column::InvalidCount, Expr::value(invalid_count))
            .filter(report::Column::Id.eq(report_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_report(id: &str, reporter_id: &str, location: &str) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: reporter_id.to_string(),
            crime_type: "theft".to_string(),
            description: "Stolen bicycle".to_string(),
            location: location.to_string(),
            reporter_address: location.to_string(),
            status: ReportStatus::Pending,
            police_id: None,
            valid_count: 0,
            invalid_count: 0,
            details: None,
            attachments: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    use chrono::Utc;

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::ReportNotFound(_))));
    }

    #[tokio::test]
    async fn test_claim_case_succeeds_when_unclaimed() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let claimed = repo.claim_case("r1", "officer1").await.unwrap();

        assert!(claimed);
    }

    #[tokio::test]
    async fn test_claim_case_fails_when_already_claimed() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let claimed = repo.claim_case("r1", "officer2").await.unwrap();

        assert!(!claimed);
    }

    #[tokio::test]
    async fn test_find_created_since() {
        let r1 = create_test_report("r1", "u1", "Dhaka-Mirpur");
        let r2 = create_test_report("r2", "u2", "Chittagong-Agrabad");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let cutoff = Utc::now() - chrono::Duration::hours(12);
        let result = repo.find_created_since(cutoff).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
