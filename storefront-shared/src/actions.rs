/// Mutation runner
///
/// Every state-changing action follows the same shape: run the mutation, then
/// record exactly one notification for its outcome. [`run_action`] owns that
/// shape so individual actions only supply the mutation and two messages.
///
/// Failures are not retried. The error text goes into the failure
/// notification and the log; callers only ever see [`GENERIC_FAILURE_MESSAGE`].
///
/// # Example
///
/// ```no_run
/// use storefront_shared::actions::{run_action, ActionContext};
/// use storefront_shared::notify::PgNotificationSink;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) {
/// let sink = PgNotificationSink::new(pool.clone());
/// let ctx = ActionContext::new(user_id, "Cart cleared", "Failed to clear cart: {error}");
///
/// let outcome = run_action(&sink, ctx, || async {
///     sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
///         .bind(user_id)
///         .execute(&pool)
///         .await
/// })
/// .await;
/// # }
/// ```

use std::fmt::Display;
use std::future::Future;

use uuid::Uuid;

use crate::models::notification::{NotificationKind, RelatedEntity};
use crate::notify::{notify, NotificationSink};

/// Message shown to the user when a mutation fails
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Placeholder replaced with the error text in failure templates
pub const ERROR_PLACEHOLDER: &str = "{error}";

/// Who the outcome is reported to and what it says
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Recipient of the outcome notification
    pub user_id: Uuid,

    /// Entity attached to both notifications
    pub related: Option<RelatedEntity>,

    /// Text of the success notification
    pub success_message: String,

    /// Text of the failure notification; `{error}` is replaced with the error
    pub failure_template: String,
}

impl ActionContext {
    pub fn new(
        user_id: Uuid,
        success_message: impl Into<String>,
        failure_template: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            related: None,
            success_message: success_message.into(),
            failure_template: failure_template.into(),
        }
    }

    /// Attaches the entity the action touches
    pub fn related_to(mut self, id: Uuid, kind: &str) -> Self {
        self.related = Some(RelatedEntity::new(id, kind));
        self
    }

    fn failure_message(&self, error: &dyn Display) -> String {
        self.failure_template
            .replace(ERROR_PLACEHOLDER, &error.to_string())
    }
}

/// Uniform result of a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    /// The mutation succeeded
    Completed(T),

    /// The mutation failed; `message` is safe to show the user
    Failed { message: String },
}

/// Failed outcome as an error value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ActionFailed {
    pub message: String,
}

impl<T> ActionOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed(_))
    }

    pub fn into_result(self) -> Result<T, ActionFailed> {
        match self {
            ActionOutcome::Completed(value) => Ok(value),
            ActionOutcome::Failed { message } => Err(ActionFailed { message }),
        }
    }
}

/// Runs `op` and reports its outcome
///
/// Exactly one notification is recorded: a success notification when `op`
/// returns `Ok`, otherwise a failure notification built from
/// `ctx.failure_template`. A notification that cannot be recorded does not
/// change the returned outcome.
pub async fn run_action<T, E, F, Fut>(
    sink: &dyn NotificationSink,
    ctx: ActionContext,
    op: F,
) -> ActionOutcome<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match op().await {
        Ok(value) => {
            notify(
                sink,
                ctx.success_message,
                NotificationKind::Success,
                ctx.related,
                ctx.user_id,
            )
            .await;

            ActionOutcome::Completed(value)
        }
        Err(e) => {
            tracing::error!(user_id = %ctx.user_id, error = %e, "Action failed");

            let message = ctx.failure_message(&e);
            notify(sink, message, NotificationKind::Error, ctx.related, ctx.user_id).await;

            ActionOutcome::Failed {
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            }
        }
    }
}
