// src/db/notification_repository.rs

use crate::errors::AppError;
use crate::models::{NewNotification, Notification};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;

/// Newest notifications returned per request
const NOTIFICATION_PAGE: i64 = 100;

pub struct NotificationRepository;

impl NotificationRepository {
    pub async fn create_notification(
        pool: &PgPool,
        notification: &NewNotification,
    ) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, title, message, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.link)
        .fetch_one(pool)
        .await
        .map_err(db_error("Failed to create notification"))
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR is_read = false)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(NOTIFICATION_PAGE)
        .fetch_all(pool)
        .await
        .map_err(db_error("Failed to list notifications"))
    }

    /// Mark one of the user's notifications read
    pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(db_error("Failed to mark notification read"))?
        .ok_or_else(|| AppError::NotFound(format!("Notification {}", id)))
    }

    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(db_error("Failed to mark notifications read"))?;

        Ok(result.rows_affected())
    }
}
