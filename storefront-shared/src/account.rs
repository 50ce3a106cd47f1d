/// Account actions
///
/// Mutations a signed-in customer performs on their own account. Each one
/// takes the caller's [`Session`] explicitly and goes through
/// [`run_action`], so the outcome is always reported as a notification.
/// Input is expected to be validated by the caller before it gets here.

use sqlx::PgPool;
use uuid::Uuid;

use crate::actions::{run_action, ActionContext, ActionOutcome};
use crate::auth::session::Session;
use crate::models::experience::{Experience, SubmitExperience};
use crate::models::settings::{SaveSettings, UserSettings};
use crate::models::support_ticket::{CreateTicket, SupportTicket};
use crate::models::user::{UpdateProfile, User};
use crate::notify::NotificationSink;

/// Updates the caller's profile fields
pub async fn update_profile(
    pool: &PgPool,
    sink: &dyn NotificationSink,
    session: &Session,
    input: UpdateProfile,
) -> ActionOutcome<User> {
    let ctx = ActionContext::new(
        session.user_id,
        "Your profile was updated successfully",
        "Failed to update profile: {error}",
    )
    .related_to(session.user_id, "user");

    run_action(sink, ctx, || User::update_profile(pool, session.user_id, input)).await
}

/// Saves the caller's account settings
pub async fn save_settings(
    pool: &PgPool,
    sink: &dyn NotificationSink,
    session: &Session,
    input: SaveSettings,
) -> ActionOutcome<UserSettings> {
    let ctx = ActionContext::new(
        session.user_id,
        "Your settings were saved",
        "Failed to save settings: {error}",
    )
    .related_to(session.user_id, "settings");

    run_action(sink, ctx, || UserSettings::upsert(pool, session.user_id, input)).await
}

/// Opens a support ticket for the caller
pub async fn open_ticket(
    pool: &PgPool,
    sink: &dyn NotificationSink,
    session: &Session,
    input: CreateTicket,
) -> ActionOutcome<SupportTicket> {
    let ticket_id = Uuid::new_v4();
    let ctx = ActionContext::new(
        session.user_id,
        format!("Support ticket \"{}\" was created", input.subject),
        "Failed to create support ticket: {error}",
    )
    .related_to(ticket_id, "ticket");

    run_action(sink, ctx, || {
        SupportTicket::create(pool, ticket_id, session.user_id, input)
    })
    .await
}

/// Records the caller's experience rating
pub async fn submit_experience(
    pool: &PgPool,
    sink: &dyn NotificationSink,
    session: &Session,
    input: SubmitExperience,
) -> ActionOutcome<Experience> {
    let experience_id = Uuid::new_v4();
    let ctx = ActionContext::new(
        session.user_id,
        "Thanks for rating your experience!",
        "Failed to submit your rating: {error}",
    )
    .related_to(experience_id, "experience");

    run_action(sink, ctx, || {
        Experience::create(pool, experience_id, session.user_id, input)
    })
    .await
}
