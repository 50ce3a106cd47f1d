/// Experience rating endpoint
///
/// ```text
/// POST /v1/experiences
/// Authorization: Bearer <session_token>
///
/// { "rating": 5, "comment": "Fast delivery" }
/// ```
///
/// Returns 201 with the stored rating. Ratings outside 1-5 are rejected with
/// 422 before anything is written.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use storefront_shared::{
    account,
    auth::session::Session,
    models::experience::{Experience, SubmitExperience},
};
use validator::Validate;

pub async fn submit_experience(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SubmitExperience>,
) -> ApiResult<(StatusCode, Json<Experience>)> {
    req.validate()?;

    let experience = account::submit_experience(&state.db, state.sink.as_ref(), &session, req)
        .await
        .into_result()?;

    Ok((StatusCode::CREATED, Json(experience)))
}
