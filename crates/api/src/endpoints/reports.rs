//! Report endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post, put},
};
use civita_common::{AppError, AppResult, attachment_key};
use civita_core::VoteSummary;
use civita_db::entities::report::{Model as ReportModel, ReportStatus};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub crime_type: String,
    pub description: String,
    pub location: String,
    pub reporter_address: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub police_id: Option<String>,
    pub valid_count: i32,
    pub invalid_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub attachments: serde_json::Value,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            id: r.id,
            reporter_id: r.reporter_id,
            crime_type: r.crime_type,
            description: r.description,
            location: r.location,
            reporter_address: r.reporter_address,
            status: r.status,
            police_id: r.police_id,
            valid_count: r.valid_count,
            invalid_count: r.invalid_count,
            details: r.details,
            attachments: r.attachments,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List reports request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsRequest {
    /// Maximum results (default: 20, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<String>,
    /// Only the caller's own reports
    #[serde(default)]
    pub mine: bool,
    /// Only case files assigned to the caller (police)
    #[serde(default)]
    pub assigned: bool,
}

const fn default_limit() -> u64 {
    20
}

/// List reports, newest first.
async fn list_reports(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(req): Query<ListReportsRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let limit = req.limit.min(100);

    let reports = if req.assigned {
        state.report_service.list_by_officer(&user.id).await?
    } else if req.mine {
        state
            .report_service
            .list_by_reporter(&user.id, limit, req.until_id.as_deref())
            .await?
    } else {
        state
            .report_service
            .list(limit, req.until_id.as_deref())
            .await?
    };

    Ok(ApiResponse::ok(
        reports.into_iter().map(Into::into).collect(),
    ))
}

/// Create report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub crime_type: String,
    pub description: String,
    pub location: String,
    pub details: Option<serde_json::Value>,
}

/// File a new report.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .create(
            &user,
            civita_core::CreateReportInput {
                crime_type: req.crime_type,
                description: req.description,
                location: req.location,
                details: req.details,
            },
        )
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Get a report by ID.
async fn get_report(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.get(&id).await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Status update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
}

/// Change a report's status (police/admin).
async fn update_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .update_status(&user, &id, req.status)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub is_valid: bool,
}

/// Cast a validation vote on a report.
async fn validate_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ValidateRequest>,
) -> AppResult<ApiResponse<VoteSummary>> {
    state
        .validation_service
        .cast(&user, &id, req.is_valid)
        .await?;

    let summary = state.validation_service.summary(&id, &user.id).await?;
    Ok(ApiResponse::ok(summary))
}

/// Aggregated vote counts plus the caller's own vote.
async fn get_validations(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<VoteSummary>> {
    let summary = state.validation_service.summary(&id, &user.id).await?;
    Ok(ApiResponse::ok(summary))
}

/// Claim an unassigned report (police).
async fn take_case(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.take_case(&user, &id).await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Delete a report (admin).
async fn delete_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.report_service.delete(&user, &id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": true })))
}

/// Upload a photo/video attachment for a report (multipart, reporter only).
async fn upload_attachment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<ReportResponse>> {
    let mut updated = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let filename = field.file_name().unwrap_or("attachment.bin").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::BadRequest("Empty attachment".to_string()));
        }

        let file_id = civita_core::generate_id();
        let key = attachment_key(&id, &file_id, &filename);
        let stored = state.storage.upload(&key, &data, &content_type).await?;

        updated = Some(
            state
                .report_service
                .add_attachment(&user, &id, &stored)
                .await?,
        );
    }

    let report =
        updated.ok_or_else(|| AppError::BadRequest("No file in request".to_string()))?;
    Ok(ApiResponse::ok(report.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/{id}", get(get_report).delete(delete_report))
        .route("/{id}/status", put(update_status))
        .route("/{id}/validate", post(validate_report))
        .route("/{id}/validations", get(get_validations))
        .route("/{id}/take-case", post(take_case))
        .route("/{id}/attachments", post(upload_attachment))
}
