//! Authentication and account endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};
use civita_common::AppResult;
use civita_db::entities::user::UserRole;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Signup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub station: Option<String>,
    pub badge_number: Option<String>,
    /// Shown to the reviewing admin for police/admin signups
    pub reason: Option<String>,
}

impl SignupRequest {
    fn into_input(self) -> (civita_core::CreateUserInput, Option<String>) {
        let reason = self.reason;
        (
            civita_core::CreateUserInput {
                username: self.username,
                password: self.password,
                email: self.email,
                name: self.name,
                phone: self.phone,
                address: self.address,
                station: self.station,
                badge_number: self.badge_number,
            },
            reason,
        )
    }
}

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    /// Absent for accounts awaiting admin approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub pending_approval: bool,
}

/// Create a citizen account (active immediately).
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let (input, _) = req.into_input();
    let user = state.user_service.signup(UserRole::Citizen, input).await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        token: user.token,
        pending_approval: false,
    }))
}

/// Create a police account (suspended until an admin approves it).
async fn police_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    reviewed_signup(&state, UserRole::Police, req).await
}

/// Create an admin account (suspended until an admin approves it).
async fn admin_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    reviewed_signup(&state, UserRole::Admin, req).await
}

async fn reviewed_signup(
    state: &AppState,
    role: UserRole,
    req: SignupRequest,
) -> AppResult<ApiResponse<SignupResponse>> {
    let (input, reason) = req.into_input();
    let user = state.user_service.signup(role, input).await?;

    state
        .approval_service
        .create_request(&user.id, role, reason)
        .await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        token: None,
        pending_approval: true,
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// When present, the account's role must match
    pub role: Option<UserRole>,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub token: String,
    pub points: i32,
}

/// Authenticate with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .user_service
        .login(civita_core::LoginInput {
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        token: user.token.unwrap_or_default(),
        points: user.points,
    }))
}

/// Email verification request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Confirm an email address with a verification token.
async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.user_service.verify_email(&req.token).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "verified": true })))
}

/// Resend-verification request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Issue a fresh verification token and resend the mail.
async fn resend_verification(
    State(state): State<AppState>,
    Json(req): Json<ResendVerificationRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.user_service.resend_verification(&req.email).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "sent": true })))
}

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub points: i32,
    pub email: String,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub thana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_number: Option<String>,
}

/// Get the caller's profile.
async fn get_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.user_service.get_profile(&user.id).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        name: user.name,
        points: user.points,
        email: profile.email,
        email_verified: profile.email_verified,
        phone: profile.phone,
        address: profile.address,
        district: profile.district,
        thana: profile.thana,
        station: profile.station,
        badge_number: profile.badge_number,
    }))
}

/// Profile update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub station: Option<String>,
}

/// Update the caller's profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .user_service
        .update_profile(
            &user.id,
            civita_core::UpdateProfileInput {
                name: req.name,
                phone: req.phone,
                address: req.address,
                station: req.station,
            },
        )
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "updated": true })))
}

/// Password change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the caller's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .user_service
        .change_password(&user.id, &req.current_password, &req.new_password)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "changed": true })))
}

/// Delete the caller's account.
async fn delete_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.user_service.delete_account(&user.id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/police/signup", post(police_signup))
        .route("/admin/signup", post(admin_signup))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/change-password", put(change_password))
        .route("/account", delete(delete_account))
}
