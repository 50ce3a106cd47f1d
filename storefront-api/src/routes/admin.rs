/// Administrator endpoints
///
/// Every handler checks the admin role before validating the request or
/// touching the database. The JSON body is still parsed first, so a
/// malformed body is rejected by the extractor before the role check.
///
/// # Endpoints
///
/// - `POST /v1/admin/tiers` - Add a tier to the ladder (201)
/// - `POST /v1/admin/users/:id/points` - Credit points to a user

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use storefront_shared::{
    auth::session::Session,
    membership::{self, AwardPoints, PointsAward},
    models::membership_tier::{CreateMembershipTier, MembershipTier},
};
use uuid::Uuid;
use validator::Validate;

/// Create a tier
///
/// ```text
/// POST /v1/admin/tiers
///
/// {
///   "title": "Gold",
///   "icon": "star",
///   "description": "Our best customers",
///   "benefits": ["Free shipping", "Early access"],
///   "min_points": 500
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: Another tier already uses `min_points`
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_tier(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateMembershipTier>,
) -> ApiResult<(StatusCode, Json<MembershipTier>)> {
    session.require_admin()?;
    req.validate()?;

    let tier = membership::create_tier(&state.db, state.sink.as_ref(), &session, req)
        .await?
        .into_result()?;

    tracing::info!(tier_id = %tier.id, min_points = tier.min_points, "Membership tier created");

    Ok((StatusCode::CREATED, Json(tier)))
}

/// Award points
///
/// ```text
/// POST /v1/admin/users/{user_id}/points
///
/// { "points": 80, "reason": "Order #1042" }
/// ```
///
/// The balance, history entry and tier assignment are written together; the
/// user is notified of the outcome.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such user
/// - `422 Unprocessable Entity`: Non-positive points or empty reason
pub async fn award_points(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AwardPoints>,
) -> ApiResult<Json<PointsAward>> {
    session.require_admin()?;
    req.validate()?;

    tracing::debug!(admin_id = %session.user_id, %user_id, points = req.points, "Awarding points");

    let award = membership::award_points(&state.db, state.sink.as_ref(), user_id, req)
        .await?
        .into_result()?;

    Ok(Json(award))
}
