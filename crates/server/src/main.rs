//! Civita server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use civita_api::{AppState, auth_middleware, router as api_router};
use civita_common::{Config, LocalStorage};
use civita_core::{
    AlertService, EmailService, NotificationService, RegistrationApprovalService, ReportService,
    StationService, UserService, ValidationService,
};
use civita_db::repositories::{
    NotificationRepository, PoliceStationRepository, RegistrationApprovalRepository,
    ReportRepository, UserProfileRepository, UserRepository, ValidationRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civita=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting civita server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = civita_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    civita_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let validation_repo = ValidationRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let station_repo = PoliceStationRepository::new(Arc::clone(&db));
    let approval_repo = RegistrationApprovalRepository::new(Arc::clone(&db));

    // Initialize services
    let notification_service = NotificationService::new(notification_repo);

    let mut user_service = UserService::new(user_repo.clone(), profile_repo.clone());
    match EmailService::new(&config.email, config.server.url.clone()) {
        Ok(email_service) => user_service.set_email(email_service),
        Err(e) => tracing::warn!(error = %e, "Email delivery unavailable"),
    }

    let mut report_service = ReportService::new(report_repo.clone(), profile_repo.clone());
    report_service.set_notifications(notification_service.clone());

    let mut validation_service = ValidationService::new(
        validation_repo,
        report_repo.clone(),
        user_repo.clone(),
    );
    validation_service.set_notifications(notification_service.clone());

    let alert_service = AlertService::new(
        report_repo,
        profile_repo,
        chrono::Duration::hours(config.alerts.visibility_hours),
    );

    let station_service = StationService::new(station_repo);

    let mut approval_service = RegistrationApprovalService::new(approval_repo, user_repo);
    approval_service.set_notifications(notification_service.clone());

    let storage = Arc::new(LocalStorage::new(
        config.storage.base_path.clone().into(),
        config.storage.base_url.clone(),
    ));

    let state = AppState {
        user_service,
        report_service,
        validation_service,
        alert_service: alert_service.clone(),
        notification_service,
        station_service,
        approval_service,
        storage,
    };

    // One periodic task owns the active-alert state; consumers subscribe
    // to the watch channel instead of polling on their own timers.
    let refresh_interval = Duration::from_secs(config.alerts.refresh_interval_secs.max(1));
    let mut active_rx = alert_service.subscribe();
    tokio::spawn(async move {
        while active_rx.changed().await.is_ok() {
            let active = *active_rx.borrow_and_update();
            info!(active, "Active-alert state changed");
        }
    });
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(e) = alert_service.refresh_active_state().await {
                tracing::warn!(error = %e, "Alert state refresh failed");
            }
        }
    });
    info!("Alert refresh task started");

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(
            &config.storage.base_url,
            ServeDir::new(&config.storage.base_path),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
