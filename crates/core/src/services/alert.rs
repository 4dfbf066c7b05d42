//! Active alert service.
//!
//! Owns the process-wide "are there active alerts" state as a
//! `tokio::sync::watch` channel. One periodic refresh task (spawned by the
//! server) recomputes the flag; every interested party subscribes to the
//! receiver instead of polling the database itself.

use std::sync::Arc;

use chrono::{Duration, Utc};
use civita_common::AppResult;
use civita_db::{
    entities::{report, user, user::UserRole},
    repositories::{ReportRepository, UserProfileRepository},
};
use serde::Serialize;
use tokio::sync::watch;

use crate::matching::{matches_citizen_address, matches_station};
use crate::visibility::{self, Remaining};

/// A report currently inside its alert window, with the time it has left.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAlert {
    #[serde(flatten)]
    pub report: report::Model,
    pub remaining: Remaining,
}

/// Alert service for business logic.
#[derive(Clone)]
pub struct AlertService {
    report_repo: ReportRepository,
    profile_repo: UserProfileRepository,
    window: Duration,
    active_tx: Arc<watch::Sender<bool>>,
}

impl AlertService {
    /// Create a new alert service with the given visibility window.
    #[must_use]
    pub fn new(
        report_repo: ReportRepository,
        profile_repo: UserProfileRepository,
        window: Duration,
    ) -> Self {
        let (active_tx, _) = watch::channel(false);
        Self {
            report_repo,
            profile_repo,
            window,
            active_tx: Arc::new(active_tx),
        }
    }

    /// Subscribe to changes of the "any active alerts" state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active_tx.subscribe()
    }

    /// Current "any active alerts" state without touching the database.
    #[must_use]
    pub fn has_active_alerts(&self) -> bool {
        *self.active_tx.borrow()
    }

    /// Recompute the active-alert state from the database and publish it.
    ///
    /// Returns the new state. Subscribers are only woken when the value
    /// actually changes.
    pub async fn refresh_active_state(&self) -> AppResult<bool> {
        let alerts = self.fetch_visible(Utc::now()).await?;
        let active = !alerts.is_empty();
        self.active_tx.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
        Ok(active)
    }

    /// Active alerts scoped to the viewer's role.
    ///
    /// Citizens see alerts whose reporter address equals their own address,
    /// police see alerts matching their station, admins see all. A viewer
    /// with no usable scope string sees everything.
    pub async fn active_alerts_for(&self, viewer: &user::Model) -> AppResult<Vec<ActiveAlert>> {
        let now = Utc::now();
        let alerts = self.fetch_visible(now).await?;

        let scope = match viewer.role {
            UserRole::Admin => None,
            UserRole::Citizen | UserRole::Police => {
                let profile = self.profile_repo.find_by_user_id(&viewer.id).await?;
                profile.and_then(|p| {
                    if viewer.role == UserRole::Police {
                        p.station
                    } else {
                        p.address
                    }
                })
            }
        };

        let Some(scope) = scope else {
            return Ok(alerts);
        };

        Ok(alerts
            .into_iter()
            .filter(|a| match viewer.role {
                UserRole::Police => {
                    matches_station(&a.report.location, &a.report.reporter_address, &scope)
                }
                _ => matches_citizen_address(&a.report.reporter_address, &scope),
            })
            .collect())
    }

    /// Active alerts matching an explicit location string.
    pub async fn active_alerts_at_location(&self, location: &str) -> AppResult<Vec<ActiveAlert>> {
        let alerts = self.fetch_visible(Utc::now()).await?;
        Ok(alerts
            .into_iter()
            .filter(|a| matches_station(&a.report.location, &a.report.reporter_address, location))
            .collect())
    }

    /// Load reports inside the window and attach their remaining time.
    ///
    /// The SQL cutoff pre-filters by age; visibility is still re-checked in
    /// process so a row created exactly at the cutoff is not off by one.
    async fn fetch_visible(&self, now: chrono::DateTime<Utc>) -> AppResult<Vec<ActiveAlert>> {
        let cutoff = now - self.window;
        let reports = self.report_repo.find_created_since(cutoff).await?;

        Ok(reports
            .into_iter()
            .filter_map(|r| {
                let created_at = r.created_at.with_timezone(&Utc);
                if !visibility::is_visible_with_window(created_at, now, self.window) {
                    return None;
                }
                let remaining = visibility::remaining_with_window(created_at, now, self.window);
                Some(ActiveAlert {
                    report: r,
                    remaining,
                })
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use civita_db::entities::report::ReportStatus;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn report_at(id: &str, location: &str, age: Duration) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: "reporter1".to_string(),
            crime_type: "theft".to_string(),
            description: "Stolen bicycle".to_string(),
            location: location.to_string(),
            reporter_address: location.to_string(),
            status: ReportStatus::Active,
            police_id: None,
            valid_count: 0,
            invalid_count: 0,
            details: None,
            attachments: serde_json::json!([]),
            created_at: (Utc::now() - age).into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> AlertService {
        AlertService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(db),
            visibility::default_window(),
        )
    }

    #[tokio::test]
    async fn test_refresh_publishes_state_change() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![report_at("r1", "Dhaka-Mirpur", Duration::hours(1))]])
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );
        let service = service(db);
        let mut rx = service.subscribe();

        assert!(!service.has_active_alerts());
        assert!(service.refresh_active_state().await.unwrap());
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        // Second refresh finds nothing and flips the state back
        assert!(!service.refresh_active_state().await.unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn test_expired_rows_are_dropped_even_if_returned() {
        // The row slips past the SQL cutoff but is past the window in
        // process; it must not surface as an alert.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![report_at(
                    "r1",
                    "Dhaka-Mirpur",
                    Duration::hours(13),
                )]])
                .into_connection(),
        );

        let alerts = service(db).active_alerts_at_location("").await.unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_location_query_uses_substring_match() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    report_at("r1", "Dhaka-Mirpur, Block D", Duration::hours(1)),
                    report_at("r2", "Chittagong-Agrabad", Duration::hours(1)),
                ]])
                .into_connection(),
        );

        let alerts = service(db)
            .active_alerts_at_location("Dhaka-Mirpur")
            .await
            .unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].report.id, "r1");
        assert!(!alerts[0].remaining.is_expired());
    }
}
