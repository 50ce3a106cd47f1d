/// Notification side effects
///
/// Every mutation reports its outcome to the acting user through a
/// [`NotificationSink`]. Recording is best-effort: a sink failure is logged
/// and swallowed so it can never undo or fail the action it describes.
///
/// # Example
///
/// ```no_run
/// use storefront_shared::models::notification::NotificationKind;
/// use storefront_shared::notify::{notify, PgNotificationSink};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) {
/// let sink = PgNotificationSink::new(pool);
/// notify(&sink, "Profile updated", NotificationKind::Success, None, user_id).await;
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::session::Session;
use crate::models::notification::{NewNotification, Notification, NotificationKind, RelatedEntity};

/// Maximum number of notifications returned by a read
pub const NOTIFICATION_PAGE_SIZE: i64 = 50;

/// Error raised by a sink that could not record a notification
#[derive(Debug, thiserror::Error)]
#[error("Failed to record notification: {0}")]
pub struct SinkError(pub String);

impl From<sqlx::Error> for SinkError {
    fn from(err: sqlx::Error) -> Self {
        SinkError(err.to_string())
    }
}

/// Destination for outcome notifications
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Persists one notification
    async fn record(&self, notification: NewNotification) -> Result<(), SinkError>;
}

/// Sink writing to the `notifications` table
#[derive(Clone)]
pub struct PgNotificationSink {
    pool: PgPool,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn record(&self, notification: NewNotification) -> Result<(), SinkError> {
        Notification::create(&self.pool, notification).await?;
        Ok(())
    }
}

/// Records a notification for `user_id`, ignoring sink failures
pub async fn notify(
    sink: &dyn NotificationSink,
    message: impl Into<String>,
    kind: NotificationKind,
    related: Option<RelatedEntity>,
    user_id: Uuid,
) {
    let notification = NewNotification {
        user_id,
        message: message.into(),
        kind,
        related,
    };

    if let Err(e) = sink.record(notification).await {
        tracing::warn!(%user_id, error = %e, "Dropping notification");
    }
}

/// The caller's most recent notifications; anonymous callers get none
pub async fn list_notifications(
    pool: &PgPool,
    session: Option<&Session>,
) -> Result<Vec<Notification>, sqlx::Error> {
    match session {
        Some(session) => {
            Notification::list_recent(pool, session.user_id, NOTIFICATION_PAGE_SIZE).await
        }
        None => Ok(Vec::new()),
    }
}

/// Marks all of the caller's notifications as read
pub async fn mark_all_read(pool: &PgPool, session: &Session) -> Result<u64, sqlx::Error> {
    Notification::mark_all_read(pool, session.user_id).await
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// In-memory sink that can be told to fail
    #[derive(Default)]
    pub struct MemorySink {
        pub recorded: Mutex<Vec<NewNotification>>,
        pub fail: bool,
    }

    impl MemorySink {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn taken(&self) -> Vec<NewNotification> {
            self.recorded.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for MemorySink {
        async fn record(&self, notification: NewNotification) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError("sink offline".to_string()));
            }
            self.recorded.lock().unwrap().push(notification);
            Ok(())
        }
    }
}
