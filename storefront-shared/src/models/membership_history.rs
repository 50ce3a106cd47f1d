/// Points history model
///
/// Append-only log of point-earning events. Rows are written in the same
/// transaction as the balance change and are never updated or deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE membership_history (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     points BIGINT NOT NULL,
///     reason VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Maximum number of entries returned by a history read
pub const HISTORY_PAGE_SIZE: i64 = 50;

/// One point-earning event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MembershipHistoryEntry {
    /// Entry ID
    pub id: Uuid,

    /// User who earned the points
    pub user_id: Uuid,

    /// Points earned by this event
    pub points: i64,

    /// Why the points were awarded (e.g. "Order #1042")
    pub reason: String,

    /// When the event was recorded
    pub created_at: DateTime<Utc>,
}

impl MembershipHistoryEntry {
    /// Appends an entry inside an open transaction
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        points: i64,
        reason: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MembershipHistoryEntry>(
            r#"
            INSERT INTO membership_history (user_id, points, reason)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, points, reason, created_at
            "#,
        )
        .bind(user_id)
        .bind(points)
        .bind(reason)
        .fetch_one(&mut **tx)
        .await
    }

    /// Most recent entries for a user, newest first, at most `limit` rows
    pub async fn list_recent(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MembershipHistoryEntry>(
            r#"
            SELECT id, user_id, points, reason, created_at
            FROM membership_history
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
}
