//! Membership points and tiers
//!
//! Reads take `Option<&Session>` and return a neutral result for anonymous
//! callers. Writes go through [`run_action`] and report their outcome as a
//! notification.
//!
//! # Example
//!
//! ```no_run
//! use storefront_shared::membership::{get_history, load_progress};
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! // Anonymous callers get the zero state, not an error
//! let progress = load_progress(&pool, None).await?;
//! assert_eq!(progress.progress, 0.0);
//!
//! let history = get_history(&pool, None).await?;
//! assert!(history.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod progress;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::actions::{run_action, ActionContext, ActionOutcome};
use crate::auth::session::Session;
use crate::models::membership_history::{MembershipHistoryEntry, HISTORY_PAGE_SIZE};
use crate::models::membership_tier::{CreateMembershipTier, MembershipTier};
use crate::models::user::User;
use crate::notify::NotificationSink;

pub use progress::{compute, progress_percent, tier_for_points, MembershipProgress};

/// Errors that reject a membership write without running it
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    /// Another tier already uses this threshold
    #[error("A tier with {0} minimum points already exists")]
    DuplicateThreshold(i64),

    /// Points awards must be positive
    #[error("Points to award must be positive, got {0}")]
    NonPositiveAward(i64),

    /// Award target does not exist
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of a points award
#[derive(Debug, Clone, serde::Serialize)]
pub struct PointsAward {
    /// History entry written for the award
    pub entry: MembershipHistoryEntry,

    /// Balance after the award
    pub points: i64,

    /// Tier assigned after the award
    pub membership_id: Option<Uuid>,
}

/// Points award request
#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct AwardPoints {
    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: i64,

    #[validate(length(min = 1, max = 255, message = "Reason must be 1-255 characters"))]
    pub reason: String,
}

/// Current tier, next tier and progress for the caller
///
/// Anonymous callers and unknown users get [`MembershipProgress::zero`].
pub async fn load_progress(
    pool: &PgPool,
    session: Option<&Session>,
) -> Result<MembershipProgress, sqlx::Error> {
    let Some(session) = session else {
        return Ok(MembershipProgress::zero());
    };

    let Some(user) = User::find_by_id(pool, session.user_id).await? else {
        tracing::debug!(user_id = %session.user_id, "Session user not found");
        return Ok(MembershipProgress::zero());
    };

    if user.membership_id.is_none() {
        return Ok(MembershipProgress::unassigned(user.points));
    }

    let tiers = MembershipTier::list_ordered(pool).await?;
    Ok(compute(user.points, user.membership_id, &tiers))
}

/// The caller's most recent point-earning events, newest first
///
/// At most [`HISTORY_PAGE_SIZE`] entries; anonymous callers get none.
pub async fn get_history(
    pool: &PgPool,
    session: Option<&Session>,
) -> Result<Vec<MembershipHistoryEntry>, sqlx::Error> {
    match session {
        Some(session) => {
            MembershipHistoryEntry::list_recent(pool, session.user_id, HISTORY_PAGE_SIZE).await
        }
        None => Ok(Vec::new()),
    }
}

async fn apply_award(
    pool: &PgPool,
    user_id: Uuid,
    input: &AwardPoints,
) -> Result<PointsAward, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let points = User::add_points(&mut tx, user_id, input.points).await?;
    let entry = MembershipHistoryEntry::append(&mut tx, user_id, input.points, &input.reason).await?;

    let tiers = MembershipTier::list_ordered(&mut *tx).await?;
    let membership_id = tier_for_points(points, &tiers).map(|tier| tier.id);
    User::set_membership(&mut tx, user_id, membership_id).await?;

    tx.commit().await?;

    tracing::info!(%user_id, awarded = input.points, points, "Points awarded");

    Ok(PointsAward {
        entry,
        points,
        membership_id,
    })
}

/// Credits points to a user, logs the event and re-evaluates their tier
///
/// The balance increment, history entry and tier assignment commit together.
/// The outcome notification goes to the awarded user.
pub async fn award_points(
    pool: &PgPool,
    sink: &dyn NotificationSink,
    user_id: Uuid,
    input: AwardPoints,
) -> Result<ActionOutcome<PointsAward>, MembershipError> {
    if input.points <= 0 {
        return Err(MembershipError::NonPositiveAward(input.points));
    }
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(MembershipError::UserNotFound(user_id));
    }

    let ctx = ActionContext::new(
        user_id,
        format!("You earned {} points: {}", input.points, input.reason),
        "Failed to award points: {error}",
    )
    .related_to(user_id, "user");

    Ok(run_action(sink, ctx, || apply_award(pool, user_id, &input)).await)
}

/// Name of the unique constraint on `membership_tiers.min_points`
const MIN_POINTS_CONSTRAINT: &str = "membership_tiers_min_points_key";

fn is_duplicate_threshold(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(MIN_POINTS_CONSTRAINT)
        }
        _ => false,
    }
}

/// Adds a tier to the ladder
///
/// Rejects a threshold already used by another tier, so every band between
/// consecutive tiers has non-zero width. A concurrent insert that wins the
/// race on the same threshold is reported as
/// [`MembershipError::DuplicateThreshold`] too, without a notification.
pub async fn create_tier(
    pool: &PgPool,
    sink: &dyn NotificationSink,
    session: &Session,
    input: CreateMembershipTier,
) -> Result<ActionOutcome<MembershipTier>, MembershipError> {
    let min_points = input.min_points;
    let tiers = MembershipTier::list_ordered(pool).await?;
    if tiers.iter().any(|tier| tier.min_points == min_points) {
        return Err(MembershipError::DuplicateThreshold(min_points));
    }

    let ctx = ActionContext::new(
        session.user_id,
        format!("Membership tier \"{}\" was created", input.title),
        "Failed to create membership tier: {error}",
    );

    let inserted = MembershipTier::create(pool, input).await;
    if matches!(&inserted, Err(e) if is_duplicate_threshold(e)) {
        tracing::debug!(min_points, "Lost race on tier threshold");
        return Err(MembershipError::DuplicateThreshold(min_points));
    }

    Ok(run_action(sink, ctx, || async { inserted }).await)
}
