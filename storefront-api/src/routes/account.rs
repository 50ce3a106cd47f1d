/// Account endpoints
///
/// Both require a session and report their outcome as a notification.
///
/// # Endpoints
///
/// - `PUT /v1/account/profile` - Update name, phone or avatar
/// - `PUT /v1/account/settings` - Replace notification and language settings

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use storefront_shared::{
    account,
    auth::session::Session,
    models::{
        settings::{SaveSettings, UserSettings},
        user::{UpdateProfile, User},
    },
};
use validator::Validate;

/// Update profile
///
/// ```text
/// PUT /v1/account/profile
/// Authorization: Bearer <session_token>
///
/// { "name": "Ada", "phone": "+1 555 0100" }
/// ```
///
/// Omitted fields keep their current value.
///
/// # Errors
///
/// - `401 Unauthorized`: No session
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Update failed (`action_failed`)
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<UpdateProfile>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = account::update_profile(&state.db, state.sink.as_ref(), &session, req)
        .await
        .into_result()?;

    Ok(Json(user))
}

pub async fn save_settings(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SaveSettings>,
) -> ApiResult<Json<UserSettings>> {
    req.validate()?;

    let settings = account::save_settings(&state.db, state.sink.as_ref(), &session, req)
        .await
        .into_result()?;

    Ok(Json(settings))
}
