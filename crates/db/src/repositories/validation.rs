//! Validation vote repository.

use std::sync::Arc;

use crate::entities::{Validation, validation};
use civita_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};

/// Validation repository for database operations.
#[derive(Clone)]
pub struct ValidationRepository {
    db: Arc<DatabaseConnection>,
}

impl ValidationRepository {
    /// Create a new validation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a vote by user and report.
    pub async fn find_by_user_and_report(
        &self,
        user_id: &str,
        report_id: &str,
    ) -> AppResult<Option<validation::Model>> {
        Validation::find()
            .filter(validation::Column::UserId.eq(user_id))
            .filter(validation::Column::ReportId.eq(report_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a user has already voted on a report.
    pub async fn has_voted(&self, user_id: &str, report_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_report(user_id, report_id)
            .await?
            .is_some())
    }

    /// Create a new vote.
    ///
    /// The `(report_id, user_id)` pair is unique; a concurrent duplicate
    /// that slips past the caller's pre-check hits the index and surfaces
    /// as a conflict rather than a generic database error.
    pub async fn create(&self, model: validation::ActiveModel) -> AppResult<validation::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Already voted on this report".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Get all votes on a report, newest first.
    pub async fn find_by_report(&self, report_id: &str) -> AppResult<Vec<validation::Model>> {
        Validation::find()
            .filter(validation::Column::ReportId.eq(report_id))
            .order_by_desc(validation::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes on a report, split by direction.
    pub async fn count_by_report(&self, report_id: &str) -> AppResult<(u64, u64)> {
        let confirmed = Validation::find()
            .filter(validation::Column::ReportId.eq(report_id))
            .filter(validation::Column::IsValid.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let disputed = Validation::find()
            .filter(validation::Column::ReportId.eq(report_id))
            .filter(validation::Column::IsValid.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((confirmed, disputed))
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    // Fallback for backends that do not expose structured error codes
    e.to_string()
        .contains("duplicate key value violates unique constraint")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, RuntimeErr, Set};

    fn create_test_vote(id: &str, user_id: &str, report_id: &str, is_valid: bool) -> validation::Model {
        validation::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            user_id: user_id.to_string(),
            is_valid,
            points_adjustment: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_voted_true() {
        let vote = create_test_vote("v1", "u1", "r1", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote]])
                .into_connection(),
        );

        let repo = ValidationRepository::new(db);
        assert!(repo.has_voted("u1", "r1").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_voted_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<validation::Model>::new()])
                .into_connection(),
        );

        let repo = ValidationRepository::new(db);
        assert!(!repo.has_voted("u1", "r2").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_vote_is_conflict() {
        // A concurrent duplicate passes the pre-check and hits the unique
        // (report_id, user_id) index on insert
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "duplicate key value violates unique constraint \
                     \"idx_validation_report_user\""
                        .to_string(),
                ))])
                .into_connection(),
        );

        let repo = ValidationRepository::new(db);
        let result = repo
            .create(validation::ActiveModel {
                id: Set("v1".to_string()),
                report_id: Set("r1".to_string()),
                user_id: Set("u1".to_string()),
                is_valid: Set(true),
                points_adjustment: Set(0),
                created_at: Set(Utc::now().into()),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_other_db_error_is_not_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "connection reset by peer".to_string(),
                ))])
                .into_connection(),
        );

        let repo = ValidationRepository::new(db);
        let result = repo
            .create(validation::ActiveModel {
                id: Set("v1".to_string()),
                report_id: Set("r1".to_string()),
                user_id: Set("u1".to_string()),
                is_valid: Set(true),
                points_adjustment: Set(0),
                created_at: Set(Utc::now().into()),
            })
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_find_by_report() {
        let v1 = create_test_vote("v1", "u1", "r1", true);
        let v2 = create_test_vote("v2", "u2", "r1", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[v1, v2]])
                .into_connection(),
        );

        let repo = ValidationRepository::new(db);
        let votes = repo.find_by_report("r1").await.unwrap();

        assert_eq!(votes.len(), 2);
    }
}
