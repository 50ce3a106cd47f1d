/// Support ticket endpoint
///
/// - `POST /v1/support/tickets` - Open a ticket (201)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use storefront_shared::{
    account,
    auth::session::Session,
    models::support_ticket::{CreateTicket, SupportTicket},
};
use validator::Validate;

pub async fn create_ticket(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateTicket>,
) -> ApiResult<(StatusCode, Json<SupportTicket>)> {
    req.validate()?;

    let ticket = account::open_ticket(&state.db, state.sink.as_ref(), &session, req)
        .await
        .into_result()?;

    tracing::info!(ticket_id = %ticket.id, user_id = %session.user_id, "Support ticket opened");

    Ok((StatusCode::CREATED, Json(ticket)))
}
