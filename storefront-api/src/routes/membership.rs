/// Membership endpoints
///
/// All three are reads and accept anonymous callers: progress falls back to
/// the zero state and history to an empty list.
///
/// # Endpoints
///
/// - `GET /v1/membership/tiers` - Tier ladder, lowest threshold first
/// - `GET /v1/membership/progress` - Caller's tier progress
/// - `GET /v1/membership/history` - Caller's 50 latest point events

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use storefront_shared::{
    auth::session::Session,
    membership::{self, MembershipProgress},
    models::{membership_history::MembershipHistoryEntry, membership_tier::MembershipTier},
};

/// Tier ladder response
#[derive(Debug, Serialize)]
pub struct TiersResponse {
    pub tiers: Vec<MembershipTier>,
}

/// Points history response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Newest first
    pub entries: Vec<MembershipHistoryEntry>,
}

pub async fn list_tiers(State(state): State<AppState>) -> ApiResult<Json<TiersResponse>> {
    let tiers = MembershipTier::list_ordered(&state.db).await?;
    Ok(Json(TiersResponse { tiers }))
}

/// Progress toward the next tier
///
/// # Response
///
/// ```json
/// {
///   "points": 130,
///   "current_tier": { "title": "Silver", "min_points": 100, ... },
///   "next_tier": { "title": "Gold", "min_points": 500, ... },
///   "progress": 7.5
/// }
/// ```
pub async fn get_progress(
    State(state): State<AppState>,
    session: Option<Session>,
) -> ApiResult<Json<MembershipProgress>> {
    let progress = membership::load_progress(&state.db, session.as_ref()).await?;
    Ok(Json(progress))
}

pub async fn get_history(
    State(state): State<AppState>,
    session: Option<Session>,
) -> ApiResult<Json<HistoryResponse>> {
    let entries = membership::get_history(&state.db, session.as_ref()).await?;
    Ok(Json(HistoryResponse { entries }))
}
