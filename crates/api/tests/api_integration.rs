//! API integration tests.
//!
//! These tests drive the router with `tower::ServiceExt::oneshot` against a
//! mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use civita_api::{AppState, auth_middleware, router as api_router};
use civita_common::LocalStorage;
use civita_core::{
    AlertService, NotificationService, RegistrationApprovalService, ReportService, StationService,
    UserService, ValidationService, visibility,
};
use civita_db::{
    entities::{police_station, report, report::ReportStatus, user, user::UserRole, user_profile},
    repositories::{
        NotificationRepository, PoliceStationRepository, RegistrationApprovalRepository,
        ReportRepository, UserProfileRepository, UserRepository, ValidationRepository,
    },
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Wire every service to the given connection.
fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let validation_repo = ValidationRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let station_repo = PoliceStationRepository::new(Arc::clone(&db));
    let approval_repo = RegistrationApprovalRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone(), profile_repo.clone()),
        report_service: ReportService::new(report_repo.clone(), profile_repo.clone()),
        validation_service: ValidationService::new(
            validation_repo,
            report_repo.clone(),
            user_repo.clone(),
        ),
        alert_service: AlertService::new(
            report_repo,
            profile_repo,
            visibility::default_window(),
        ),
        notification_service: NotificationService::new(notification_repo),
        station_service: StationService::new(station_repo),
        approval_service: RegistrationApprovalService::new(approval_repo, user_repo),
        storage: Arc::new(LocalStorage::new(
            "/tmp/civita-test-files".into(),
            "/files".to_string(),
        )),
    }
}

fn app_with_state(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn create_app(db: DatabaseConnection) -> Router {
    app_with_state(create_state(db))
}

fn test_user(id: &str, role: UserRole) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: format!("user-{id}"),
        username_lower: format!("user-{id}"),
        role,
        token: Some(format!("token-{id}")),
        name: None,
        is_suspended: false,
        points: 0,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_profile(user_id: &str, address: &str) -> user_profile::Model {
    user_profile::Model {
        user_id: user_id.to_string(),
        password: None,
        email: format!("{user_id}@example.com"),
        email_verified: true,
        verification_token: None,
        verification_expires_at: None,
        phone: None,
        address: Some(address.to_string()),
        district: None,
        thana: None,
        station: None,
        badge_number: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_report(id: &str, location: &str) -> report::Model {
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
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_station(id: &str, district: &str, thana: &str) -> police_station::Model {
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
async fn test_notifications_require_auth() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    // Token lookup finds nothing, so the request stays unauthenticated
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports")
                .header(header::AUTHORIZATION, "Bearer bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_police_stations_are_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            test_station("s1", "Dhaka", "Gulshan"),
            test_station("s2", "Dhaka", "Mirpur"),
        ]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/police-stations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_take_case_forbidden_for_citizen() {
    // Auth lookup resolves a citizen token
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("c1", UserRole::Citizen)]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/r1/take-case")
                .header(header::AUTHORIZATION, "Bearer token-c1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_requests_forbidden_for_police() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("p1", UserRole::Police)]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/police/requests")
                .header(header::AUTHORIZATION, "Bearer token-p1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_alert_flag_is_global_not_viewer_scoped() {
    // An alert is active far from the caller. Their scoped list is empty,
    // but the process-wide flag still reports activity.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // refresh task pass
        .append_query_results([vec![test_report("r1", "Chittagong-Agrabad")]])
        // auth lookup
        .append_query_results([vec![test_user("c1", UserRole::Citizen)]])
        // visible reports, then the caller's profile
        .append_query_results([vec![test_report("r1", "Chittagong-Agrabad")]])
        .append_query_results([vec![test_profile("c1", "Dhaka-Mirpur")]])
        .into_connection();

    let state = create_state(db);
    assert!(state.alert_service.refresh_active_state().await.unwrap());
    let app = app_with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/crime-alerts")
                .header(header::AUTHORIZATION, "Bearer token-c1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["data"]["alerts"], serde_json::json!([]));
    assert_eq!(body["data"]["hasActiveAlerts"], serde_json::json!(true));
}

#[tokio::test]
async fn test_unknown_report_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth lookup, then report lookup
        .append_query_results([vec![test_user("c1", UserRole::Citizen)]])
        .append_query_results([Vec::<civita_db::entities::report::Model>::new()])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/missing")
                .header(header::AUTHORIZATION, "Bearer token-c1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
