//! Notification service.

use chrono::Utc;
use civita_common::{AppError, AppResult, IdGenerator};
use civita_db::{
    entities::{notification, notification::NotificationType},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a notification.
    pub async fn notify(
        &self,
        recipient_id: &str,
        actor_id: Option<&str>,
        notification_type: NotificationType,
        report_id: Option<&str>,
        body: Option<String>,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipient_id: Set(recipient_id.to_string()),
            actor_id: Set(actor_id.map(String::from)),
            notification_type: Set(notification_type),
            report_id: Set(report_id.map(String::from)),
            body: Set(body),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Get notifications for a user.
    pub async fn list(
        &self,
        recipient_id: &str,
        limit: u64,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_recipient(recipient_id, limit, until_id, unread_only)
            .await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, recipient_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(recipient_id).await
    }

    /// Mark a notification as read. Only the recipient may do this.
    pub async fn mark_as_read(&self, recipient_id: &str, id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.recipient_id != recipient_id {
            return Err(AppError::Forbidden("Not your notification".to_string()));
        }

        self.notification_repo.mark_as_read(id).await
    }

    /// Mark all of a user's notifications as read.
    pub async fn mark_all_as_read(&self, recipient_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(recipient_id).await
    }

    /// Delete a notification. Only the recipient may do this.
    pub async fn delete(&self, recipient_id: &str, id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.recipient_id != recipient_id {
            return Err(AppError::Forbidden("Not your notification".to_string()));
        }

        self.notification_repo.delete(id).await
    }
}
