//! Registration approval service.
//!
//! Police and admin signups land suspended until an existing admin reviews
//! them. Approval lifts the suspension and notifies the applicant; rejection
//! records the reviewer's note and leaves the account suspended.

use chrono::Utc;
use civita_common::{AppError, AppResult, IdGenerator};
use civita_db::{
    entities::{
        notification::NotificationType,
        registration_approval::{self, ApprovalStatus},
        user::{self, UserRole},
    },
    repositories::{RegistrationApprovalRepository, UserRepository},
};
use sea_orm::Set;

use crate::services::notification::NotificationService;

/// Registration approval service for business logic.
#[derive(Clone)]
pub struct RegistrationApprovalService {
    approval_repo: RegistrationApprovalRepository,
    user_repo: UserRepository,
    notifications: Option<NotificationService>,
    id_gen: IdGenerator,
}

impl RegistrationApprovalService {
    /// Create a new registration approval service.
    #[must_use]
    pub fn new(approval_repo: RegistrationApprovalRepository, user_repo: UserRepository) -> Self {
        Self {
            approval_repo,
            user_repo,
            notifications: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification service.
    pub fn set_notifications(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    /// Record a pending approval request for a freshly created account.
    pub async fn create_request(
        &self,
        user_id: &str,
        requested_role: UserRole,
        reason: Option<String>,
    ) -> AppResult<registration_approval::Model> {
        let model = registration_approval::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            requested_role: Set(requested_role),
            reason: Set(reason),
            status: Set(ApprovalStatus::Pending),
            reviewed_by: Set(None),
            review_note: Set(None),
            created_at: Set(Utc::now().into()),
            reviewed_at: Set(None),
        };

        self.approval_repo.create(model).await
    }

    /// List approval requests. Admin only.
    pub async fn list(
        &self,
        actor: &user::Model,
        status: Option<ApprovalStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration_approval::Model>> {
        if actor.role != UserRole::Admin {
            return Err(AppError::RoleMismatch("admin".to_string()));
        }
        self.approval_repo.list(status, limit, offset).await
    }

    /// Approve a pending request: unsuspend the account and notify it.
    pub async fn approve(
        &self,
        actor: &user::Model,
        request_id: &str,
    ) -> AppResult<registration_approval::Model> {
        let request = self.review(actor, request_id).await?;

        let applicant = self.user_repo.get_by_id(&request.user_id).await?;
        let mut active: user::ActiveModel = applicant.into();
        active.is_suspended = Set(false);
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        let mut update: registration_approval::ActiveModel = request.into();
        update.status = Set(ApprovalStatus::Approved);
        update.reviewed_by = Set(Some(actor.id.clone()));
        update.reviewed_at = Set(Some(Utc::now().into()));
        let reviewed = self.approval_repo.update(update).await?;

        self.notify_applicant(
            &reviewed.user_id,
            &actor.id,
            NotificationType::RegistrationApproved,
            "Your registration has been approved".to_string(),
        )
        .await;

        Ok(reviewed)
    }

    /// Reject a pending request with an optional note.
    pub async fn reject(
        &self,
        actor: &user::Model,
        request_id: &str,
        note: Option<String>,
    ) -> AppResult<registration_approval::Model> {
        let request = self.review(actor, request_id).await?;

        let mut update: registration_approval::ActiveModel = request.into();
        update.status = Set(ApprovalStatus::Rejected);
        update.reviewed_by = Set(Some(actor.id.clone()));
        update.review_note = Set(note);
        update.reviewed_at = Set(Some(Utc::now().into()));
        let reviewed = self.approval_repo.update(update).await?;

        self.notify_applicant(
            &reviewed.user_id,
            &actor.id,
            NotificationType::RegistrationRejected,
            "Your registration has been rejected".to_string(),
        )
        .await;

        Ok(reviewed)
    }

    /// Shared guard for review actions: admin only, request must exist and
    /// still be pending.
    async fn review(
        &self,
        actor: &user::Model,
        request_id: &str,
    ) -> AppResult<registration_approval::Model> {
        if actor.role != UserRole::Admin {
            return Err(AppError::RoleMismatch("admin".to_string()));
        }

        let request = self
            .approval_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Approval request not found".to_string()))?;

        if request.status != ApprovalStatus::Pending {
            return Err(AppError::Conflict("Request already reviewed".to_string()));
        }

        Ok(request)
    }

    async fn notify_applicant(
        &self,
        user_id: &str,
        actor_id: &str,
        notification_type: NotificationType,
        body: String,
    ) {
        if let Some(notifications) = &self.notifications
            && let Err(e) = notifications
                .notify(user_id, Some(actor_id), notification_type, None, Some(body))
                .await
        {
            tracing::warn!(error = %e, "Failed to create registration notification");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn admin(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            username_lower: id.to_string(),
            role: UserRole::Admin,
            token: None,
            name: None,
            is_suspended: false,
            points: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn citizen(id: &str) -> user::Model {
        user::Model {
            role: UserRole::Citizen,
            ..admin(id)
        }
    }

    fn request(id: &str, user_id: &str, status: ApprovalStatus) -> registration_approval::Model {
        registration_approval::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            requested_role: UserRole::Police,
            reason: None,
            status,
            reviewed_by: None,
            review_note: None,
            created_at: Utc::now().into(),
            reviewed_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> RegistrationApprovalService {
        RegistrationApprovalService::new(
            RegistrationApprovalRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_list_rejects_non_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db).list(&citizen("c1"), None, 10, 0).await;
        assert!(matches!(result, Err(AppError::RoleMismatch(_))));
    }

    #[tokio::test]
    async fn test_approve_rejects_already_reviewed_request() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![request("q1", "u1", ApprovalStatus::Approved)]])
                .into_connection(),
        );

        let result = service(db).approve(&admin("a1"), "q1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_approve_unsuspends_applicant() {
        let mut applicant = citizen("u1");
        applicant.role = UserRole::Police;
        applicant.is_suspended = true;

        let mut unsuspended = applicant.clone();
        unsuspended.is_suspended = false;

        let mut approved = request("q1", "u1", ApprovalStatus::Approved);
        approved.reviewed_by = Some("a1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // pending request, applicant lookup
                .append_query_results([vec![request("q1", "u1", ApprovalStatus::Pending)]])
                .append_query_results([vec![applicant]])
                // user update returning, approval update returning
                .append_query_results([vec![unsuspended]])
                .append_query_results([vec![approved]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let reviewed = service(db).approve(&admin("a1"), "q1").await.unwrap();

        assert_eq!(reviewed.status, ApprovalStatus::Approved);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some("a1"));
    }
}
