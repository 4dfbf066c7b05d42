//! Registration approval repository.

use std::sync::Arc;

use crate::entities::{
    RegistrationApproval, registration_approval, registration_approval::ApprovalStatus,
};
use civita_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Registration approval repository for database operations.
#[derive(Clone)]
pub struct RegistrationApprovalRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrationApprovalRepository {
    /// Create a new registration approval repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an approval request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registration_approval::Model>> {
        RegistrationApproval::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an approval request by user ID.
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Option<registration_approval::Model>> {
        RegistrationApproval::find()
            .filter(registration_approval::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new approval request.
    pub async fn create(
        &self,
        model: registration_approval::ActiveModel,
    ) -> AppResult<registration_approval::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an approval request.
    pub async fn update(
        &self,
        model: registration_approval::ActiveModel,
    ) -> AppResult<registration_approval::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List approval requests, newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<ApprovalStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration_approval::Model>> {
        let mut query = RegistrationApproval::find()
            .order_by_desc(registration_approval::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(registration_approval::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
