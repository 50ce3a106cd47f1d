/// Support ticket model
///
/// # Schema
///
/// ```sql
/// CREATE TYPE ticket_status AS ENUM ('open', 'in_progress', 'closed');
///
/// CREATE TABLE support_tickets (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     subject VARCHAR(200) NOT NULL,
///     message TEXT NOT NULL,
///     status ticket_status NOT NULL DEFAULT 'open',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The ID is generated by the caller so that it is known before the insert
/// runs and can be attached to the outcome notification either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Ticket lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

/// Support ticket row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Ticket form input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTicket {
    #[validate(length(min = 3, max = 200, message = "Subject must be 3-200 characters"))]
    pub subject: String,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub message: String,
}

impl SupportTicket {
    /// Opens a ticket with a caller-chosen ID
    pub async fn create(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: CreateTicket,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets (id, user_id, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, subject, message, status, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.subject)
        .bind(data.message)
        .fetch_one(pool)
        .await
    }
}
