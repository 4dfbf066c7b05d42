//! API middleware.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use civita_common::StorageBackend;
use civita_core::{
    AlertService, NotificationService, RegistrationApprovalService, ReportService, StationService,
    UserService, ValidationService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub report_service: ReportService,
    pub validation_service: ValidationService,
    pub alert_service: AlertService,
    pub notification_service: NotificationService,
    pub station_service: StationService,
    pub approval_service: RegistrationApprovalService,
    pub storage: Arc<dyn StorageBackend>,
}

/// Authentication middleware.
///
/// Resolves the bearer token to a user and stashes it in request
/// extensions; handlers opt in via the `AuthUser` extractor. Requests
/// without a valid token simply proceed unauthenticated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
