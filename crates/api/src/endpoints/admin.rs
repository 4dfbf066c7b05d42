//! Admin endpoints: registration approval queue.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};
use civita_common::AppResult;
use civita_db::entities::{
    registration_approval::{ApprovalStatus, Model as ApprovalModel},
    user::UserRole,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Approval request response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub id: String,
    pub user_id: String,
    pub requested_role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: ApprovalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

impl From<ApprovalModel> for ApprovalResponse {
    fn from(r: ApprovalModel) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            requested_role: r.requested_role,
            reason: r.reason,
            status: r.status,
            reviewed_by: r.reviewed_by,
            review_note: r.review_note,
            created_at: r.created_at.to_rfc3339(),
            reviewed_at: r.reviewed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List approval requests query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    /// Filter by status (default: all)
    pub status: Option<ApprovalStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    50
}

/// List registration approval requests (admin).
async fn list_requests(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> AppResult<ApiResponse<Vec<ApprovalResponse>>> {
    let requests = state
        .approval_service
        .list(&user, query.status, query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(
        requests.into_iter().map(Into::into).collect(),
    ))
}

/// Approve a pending registration (admin).
async fn approve_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ApprovalResponse>> {
    let reviewed = state.approval_service.approve(&user, &id).await?;
    Ok(ApiResponse::ok(reviewed.into()))
}

/// Rejection request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub note: Option<String>,
}

/// Reject a pending registration (admin).
async fn reject_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RejectRequest>>,
) -> AppResult<ApiResponse<ApprovalResponse>> {
    let note = body.and_then(|Json(req)| req.note);
    let reviewed = state.approval_service.reject(&user, &id, note).await?;
    Ok(ApiResponse::ok(reviewed.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests))
        .route("/requests/approve/{id}", put(approve_request))
        .route("/requests/reject/{id}", delete(reject_request))
}
