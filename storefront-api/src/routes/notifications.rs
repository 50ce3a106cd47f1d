/// Notification endpoints
///
/// # Endpoints
///
/// - `GET /v1/notifications` - Caller's latest notifications (empty when anonymous)
/// - `POST /v1/notifications/read` - Mark all of the caller's notifications read

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use storefront_shared::{auth::session::Session, models::notification::Notification, notify};

/// Notification list response
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    /// Newest first
    pub notifications: Vec<Notification>,

    /// Unread count within this page
    pub unread: usize,
}

/// Mark-read response
#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    /// Number of notifications that changed state
    pub updated: u64,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    session: Option<Session>,
) -> ApiResult<Json<NotificationsResponse>> {
    let notifications = notify::list_notifications(&state.db, session.as_ref()).await?;
    let unread = notifications.iter().filter(|n| !n.read).count();

    Ok(Json(NotificationsResponse {
        notifications,
        unread,
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<MarkReadResponse>> {
    let updated = notify::mark_all_read(&state.db, &session).await?;
    Ok(Json(MarkReadResponse { updated }))
}
