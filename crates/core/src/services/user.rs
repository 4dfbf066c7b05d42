//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use civita_common::{AppError, AppResult, IdGenerator, is_valid_address, is_valid_phone};
use civita_db::{
    entities::{user, user::UserRole, user_profile},
    repositories::{UserProfileRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::email::EmailService;

/// How long an email verification token stays usable.
const VERIFICATION_TOKEN_HOURS: i64 = 24;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    email: Option<EmailService>,
    id_gen: IdGenerator,
}

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 256))]
    pub name: Option<String>,

    pub phone: Option<String>,

    /// "District-Thana" by convention
    pub address: Option<String>,

    /// Assigned station (police signups)
    pub station: Option<String>,

    /// Badge number (police signups)
    pub badge_number: Option<String>,
}

/// Input for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// When present, the account's role must match (the frontend has
    /// separate login surfaces per role).
    pub role: Option<UserRole>,
}

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 256))]
    pub name: Option<String>,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub station: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository, profile_repo: UserProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
            email: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the email service for verification mail.
    pub fn set_email(&mut self, email: EmailService) {
        self.email = Some(email);
    }

    /// Create a new account with the given role.
    ///
    /// Citizen accounts are active immediately. Police and admin accounts
    /// start suspended; an admin must approve the registration before they
    /// can authenticate.
    pub async fn signup(&self, role: UserRole, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if let Some(phone) = &input.phone
            && !is_valid_phone(phone)
        {
            return Err(AppError::Validation("Invalid phone number".to_string()));
        }

        if let Some(address) = &input.address
            && !is_valid_address(address)
        {
            return Err(AppError::Validation(
                "Address must follow the District-Thana format".to_string(),
            ));
        }

        if role == UserRole::Police && input.station.is_none() {
            return Err(AppError::Validation(
                "Police accounts require a station".to_string(),
            ));
        }

        if self.user_repo.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        if self.profile_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();
        let verification_token = self.id_gen.generate_token();
        let now = Utc::now();

        let (district, thana) = input
            .address
            .as_deref()
            .and_then(civita_common::split_district_thana)
            .map_or((None, None), |(d, t)| {
                (Some(d.to_string()), Some(t.to_string()))
            });

        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            role: Set(role),
            token: Set(Some(token)),
            name: Set(input.name),
            is_suspended: Set(role != UserRole::Citizen),
            points: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(user_model).await?;

        let profile_model = user_profile::ActiveModel {
            user_id: Set(user_id),
            password: Set(Some(password_hash)),
            email: Set(input.email.clone()),
            email_verified: Set(false),
            verification_token: Set(Some(verification_token.clone())),
            verification_expires_at: Set(Some(
                (now + Duration::hours(VERIFICATION_TOKEN_HOURS)).into(),
            )),
            phone: Set(input.phone),
            address: Set(input.address),
            district: Set(district),
            thana: Set(thana),
            station: Set(input.station),
            badge_number: Set(input.badge_number),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        self.profile_repo.create(profile_model).await?;

        if let Some(email) = &self.email
            && let Err(e) = email
                .send_verification(&input.email, &user.username, &verification_token)
                .await
        {
            tracing::warn!(error = %e, "Failed to send verification email");
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user's profile.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.is_suspended {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Authenticate a user by email and password.
    pub async fn login(&self, input: LoginInput) -> AppResult<user::Model> {
        let profile = self
            .profile_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::UserNotFound(input.email.clone()))?;

        let password_hash = profile.password.as_deref().ok_or(AppError::Unauthorized)?;
        if !verify_password(&input.password, password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let user = self.user_repo.get_by_id(&profile.user_id).await?;

        if let Some(expected) = input.role
            && user.role != expected
        {
            return Err(AppError::RoleMismatch(format!("{expected:?}").to_lowercase()));
        }

        if user.is_suspended {
            return Err(AppError::Forbidden(
                "Account pending approval".to_string(),
            ));
        }

        Ok(user)
    }

    /// Update a user's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user_profile::Model> {
        input.validate()?;

        if let Some(phone) = &input.phone
            && !is_valid_phone(phone)
        {
            return Err(AppError::Validation("Invalid phone number".to_string()));
        }

        if let Some(address) = &input.address
            && !is_valid_address(address)
        {
            return Err(AppError::Validation(
                "Address must follow the District-Thana format".to_string(),
            ));
        }

        if let Some(name) = input.name {
            let user = self.user_repo.get_by_id(user_id).await?;
            let mut active: user::ActiveModel = user.into();
            active.name = Set(Some(name));
            active.updated_at = Set(Some(Utc::now().into()));
            self.user_repo.update(active).await?;
        }

        let profile = self.get_profile(user_id).await?;
        let mut active: user_profile::ActiveModel = profile.into();

        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            let (district, thana) = civita_common::split_district_thana(&address)
                .map_or((None, None), |(d, t)| {
                    (Some(d.to_string()), Some(t.to_string()))
                });
            active.address = Set(Some(address));
            active.district = Set(district);
            active.thana = Set(thana);
        }
        if let Some(station) = input.station {
            active.station = Set(Some(station));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.profile_repo.update(active).await
    }

    /// Change a user's password, verifying the current one first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current: &str,
        new: &str,
    ) -> AppResult<()> {
        if new.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let profile = self.get_profile(user_id).await?;
        let password_hash = profile.password.as_deref().ok_or(AppError::Unauthorized)?;
        if !verify_password(current, password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let mut active: user_profile::ActiveModel = profile.into();
        active.password = Set(Some(hash_password(new)?));
        active.updated_at = Set(Some(Utc::now().into()));
        self.profile_repo.update(active).await?;

        Ok(())
    }

    /// Delete an account and its profile.
    pub async fn delete_account(&self, user_id: &str) -> AppResult<()> {
        self.profile_repo.delete(user_id).await?;
        self.user_repo.delete(user_id).await?;
        Ok(())
    }

    /// Verify an email address with a pending token.
    pub async fn verify_email(&self, token: &str) -> AppResult<user_profile::Model> {
        let profile = self
            .profile_repo
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid verification token".to_string()))?;

        let expired = profile
            .verification_expires_at
            .is_none_or(|t| t < Utc::now());
        if expired {
            return Err(AppError::BadRequest(
                "Verification token expired".to_string(),
            ));
        }

        let mut active: user_profile::ActiveModel = profile.into();
        active.email_verified = Set(true);
        active.verification_token = Set(None);
        active.verification_expires_at = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));

        self.profile_repo.update(active).await
    }

    /// Issue a fresh verification token and resend the mail.
    pub async fn resend_verification(&self, email: &str) -> AppResult<()> {
        let profile = self
            .profile_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::UserNotFound(email.to_string()))?;

        if profile.email_verified {
            return Err(AppError::BadRequest("Email already verified".to_string()));
        }

        let user = self.user_repo.get_by_id(&profile.user_id).await?;
        let token = self.id_gen.generate_token();
        let address = profile.email.clone();

        let mut active: user_profile::ActiveModel = profile.into();
        active.verification_token = Set(Some(token.clone()));
        active.verification_expires_at = Set(Some(
            (Utc::now() + Duration::hours(VERIFICATION_TOKEN_HOURS)).into(),
        ));
        self.profile_repo.update(active).await?;

        if let Some(mailer) = &self.email {
            mailer.send_verification(&address, &user.username, &token).await?;
        }

        Ok(())
    }
}

/// Hash a password with Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }
}
