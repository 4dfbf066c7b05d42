//! Police station repository.

use std::sync::Arc;

use crate::entities::{PoliceStation, police_station};
use civita_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Police station repository for database operations.
#[derive(Clone)]
pub struct PoliceStationRepository {
    db: Arc<DatabaseConnection>,
}

impl PoliceStationRepository {
    /// Create a new police station repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List all stations, ordered by district then thana.
    pub async fn find_all(&self) -> AppResult<Vec<police_station::Model>> {
        PoliceStation::find()
            .order_by_asc(police_station::Column::District)
            .order_by_asc(police_station::Column::Thana)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List thanas for a district (case-insensitive).
    pub async fn find_by_district(&self, district: &str) -> AppResult<Vec<police_station::Model>> {
        PoliceStation::find()
            .filter(police_station::Column::District.eq(district))
            .order_by_asc(police_station::Column::Thana)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a station entry.
    pub async fn create(
        &self,
        model: police_station::ActiveModel,
    ) -> AppResult<police_station::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
