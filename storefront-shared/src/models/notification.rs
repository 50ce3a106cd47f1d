/// Notification model
///
/// Persisted, user-facing record of an action's outcome. Written as a side
/// effect of mutations; the action that writes one never reads it back.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE notification_kind AS ENUM ('success', 'error');
///
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     message TEXT NOT NULL,
///     kind notification_kind NOT NULL,
///     related_entity_id UUID,
///     related_entity_type VARCHAR(32),
///     read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Outcome a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Entity a notification points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    /// Entity ID
    pub id: Uuid,

    /// Entity type (e.g. "ticket", "user")
    pub kind: String,
}

impl RelatedEntity {
    pub fn new(id: Uuid, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

/// Notification row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub related_entity_id: Option<Uuid>,
    pub related_entity_type: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// Recipient
    pub user_id: Uuid,

    /// Text shown to the user
    pub message: String,

    /// Success or failure
    pub kind: NotificationKind,

    /// Entity the action touched, if any
    pub related: Option<RelatedEntity>,
}

impl Notification {
    /// Inserts a notification
    pub async fn create(pool: &PgPool, data: NewNotification) -> Result<Self, sqlx::Error> {
        let (related_id, related_type) = match data.related {
            Some(entity) => (Some(entity.id), Some(entity.kind)),
            None => (None, None),
        };

        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message, kind, related_entity_id, related_entity_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, message, kind, related_entity_id, related_entity_type,
                      read, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.message)
        .bind(data.kind)
        .bind(related_id)
        .bind(related_type)
        .fetch_one(pool)
        .await
    }

    /// Most recent notifications for a user, newest first
    pub async fn list_recent(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, kind, related_entity_id, related_entity_type,
                   read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Marks every unread notification as read; returns how many changed
    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
