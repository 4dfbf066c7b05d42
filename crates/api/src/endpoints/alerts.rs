//! Crime alert endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use civita_common::AppResult;
use civita_core::{ActiveAlert, visibility::Remaining};
use civita_db::entities::report::ReportStatus;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Active alert response: the report plus its countdown.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub id: String,
    pub reporter_id: String,
    pub crime_type: String,
    pub description: String,
    pub location: String,
    pub reporter_address: String,
    pub status: ReportStatus,
    pub valid_count: i32,
    pub invalid_count: i32,
    pub created_at: String,
    pub remaining: Remaining,
}

impl From<ActiveAlert> for AlertResponse {
    fn from(a: ActiveAlert) -> Self {
        Self {
            id: a.report.id,
            reporter_id: a.report.reporter_id,
            crime_type: a.report.crime_type,
            description: a.report.description,
            location: a.report.location,
            reporter_address: a.report.reporter_address,
            status: a.report.status,
            valid_count: a.report.valid_count,
            invalid_count: a.report.invalid_count,
            created_at: a.report.created_at.to_rfc3339(),
            remaining: a.remaining,
        }
    }
}

/// Alert list response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    pub alerts: Vec<AlertResponse>,
    /// Process-wide indicator maintained by the periodic refresh task.
    /// Covers all currently-visible alerts, not just the caller's scope.
    pub has_active_alerts: bool,
}

/// Active alerts scoped to the caller's role.
async fn list_alerts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AlertsResponse>> {
    let alerts = state.alert_service.active_alerts_for(&user).await?;

    Ok(ApiResponse::ok(AlertsResponse {
        has_active_alerts: state.alert_service.has_active_alerts(),
        alerts: alerts.into_iter().map(Into::into).collect(),
    }))
}

/// Location query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    #[serde(default)]
    pub location: String,
}

/// Active alerts matching an explicit location string.
async fn alerts_at_location(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<ApiResponse<AlertsResponse>> {
    let alerts = state
        .alert_service
        .active_alerts_at_location(&query.location)
        .await?;

    Ok(ApiResponse::ok(AlertsResponse {
        has_active_alerts: state.alert_service.has_active_alerts(),
        alerts: alerts.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/location", get(alerts_at_location))
}
