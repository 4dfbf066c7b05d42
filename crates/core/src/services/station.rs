//! Police station directory service.

use civita_common::{AppError, AppResult};
use civita_db::repositories::PoliceStationRepository;
use serde::Serialize;

/// A district with its thanas, as served to registration forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStations {
    pub district: String,
    pub thanas: Vec<String>,
}

/// Station directory service.
#[derive(Clone)]
pub struct StationService {
    station_repo: PoliceStationRepository,
}

impl StationService {
    /// Create a new station service.
    #[must_use]
    pub const fn new(station_repo: PoliceStationRepository) -> Self {
        Self { station_repo }
    }

    /// All stations grouped by district, districts and thanas sorted.
    pub async fn list_districts(&self) -> AppResult<Vec<DistrictStations>> {
        let stations = self.station_repo.find_all().await?;

        let mut grouped: Vec<DistrictStations> = Vec::new();
        for station in stations {
            // Rows arrive ordered by district, so the last group is the
            // current one.
            match grouped.last_mut() {
                Some(group) if group.district == station.district => {
                    group.thanas.push(station.thana);
                }
                _ => grouped.push(DistrictStations {
                    district: station.district,
                    thanas: vec![station.thana],
                }),
            }
        }

        Ok(grouped)
    }

    /// Thanas for one district.
    pub async fn thanas(&self, district: &str) -> AppResult<Vec<String>> {
        let stations = self.station_repo.find_by_district(district).await?;
        if stations.is_empty() {
            return Err(AppError::NotFound(format!(
                "No stations found for district {district}"
            )));
        }
        Ok(stations.into_iter().map(|s| s.thana).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use civita_db::entities::police_station;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn station(id: &str, district: &str, thana: &str) -> police_station::Model {
        police_station::Model {
            id: id.to_string(),
            name: format!("{thana} Police Station"),
            district: district.to_string(),
            thana: thana.to_string(),
            address: None,
            phone: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_districts_groups_ordered_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    station("s1", "Chittagong", "Agrabad"),
                    station("s2", "Dhaka", "Gulshan"),
                    station("s3", "Dhaka", "Mirpur"),
                ]])
                .into_connection(),
        );

        let service = StationService::new(PoliceStationRepository::new(db));
        let districts = service.list_districts().await.unwrap();

        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].district, "Chittagong");
        assert_eq!(districts[1].thanas, vec!["Gulshan", "Mirpur"]);
    }

    #[tokio::test]
    async fn test_thanas_unknown_district() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<police_station::Model>::new()])
                .into_connection(),
        );

        let service = StationService::new(PoliceStationRepository::new(db));
        let result = service.thanas("Atlantis").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
