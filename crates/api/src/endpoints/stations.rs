//! Police station directory endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use civita_common::AppResult;
use civita_core::DistrictStations;

use crate::{middleware::AppState, response::ApiResponse};

/// All stations grouped by district. Public: signup forms use this.
async fn list_stations(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DistrictStations>>> {
    let districts = state.station_service.list_districts().await?;
    Ok(ApiResponse::ok(districts))
}

/// Thanas for one district.
async fn list_thanas(
    State(state): State<AppState>,
    Path(district): Path<String>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let thanas = state.station_service.thanas(&district).await?;
    Ok(ApiResponse::ok(thanas))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stations))
        .route("/thanas/{district}", get(list_thanas))
}
