//! API endpoints.

mod admin;
mod alerts;
mod auth;
mod notifications;
mod reports;
mod stations;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/reports", reports::router())
        .nest("/crime-alerts", alerts::router())
        .nest("/notifications", notifications::router())
        .nest("/police-stations", stations::router())
        .nest("/police", admin::router())
}
