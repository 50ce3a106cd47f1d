/// Request session resolution for Axum
///
/// The caller's identity is resolved once per request by [`attach_session`]
/// and then passed explicitly to every operation as a [`Session`] value.
/// Nothing reads identity from ambient state.
///
/// A token is accepted from either:
/// - `Authorization: Bearer <token>`
/// - the `session` cookie
///
/// Missing or invalid tokens leave the request anonymous. Handlers decide what
/// anonymity means: reads take `Option<Session>` and return neutral results,
/// mutations take `Session` and reject with 401.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use storefront_shared::auth::session::{attach_session, Session};
/// use storefront_shared::auth::token::SessionKeys;
///
/// async fn whoami(session: Option<Session>) -> String {
///     match session {
///         Some(s) => s.user_id.to_string(),
///         None => "anonymous".to_string(),
///     }
/// }
///
/// let keys = SessionKeys::new("a-secret-that-is-at-least-32-bytes!", "storefront");
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(keys, attach_session));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::token::{self, SessionKeys};
use crate::models::user::UserRole;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Session {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Fails with [`SessionRejection::Forbidden`] unless the caller is an admin
    pub fn require_admin(&self) -> Result<(), SessionRejection> {
        match self.role {
            UserRole::Admin => Ok(()),
            UserRole::Customer => Err(SessionRejection::Forbidden),
        }
    }
}

/// Why a handler refused the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionRejection {
    /// No valid session on the request
    #[error("Authentication required")]
    Required,

    /// Session present but lacks the admin role
    #[error("Administrator access required")]
    Forbidden,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            SessionRejection::Required => (StatusCode::UNAUTHORIZED, "unauthorized"),
            SessionRejection::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        };

        (status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Resolves the session carried by `headers`, if any
///
/// The bearer header wins over the cookie when both are present.
pub fn resolve(headers: &HeaderMap, keys: &SessionKeys) -> Option<Session> {
    let raw = bearer_token(headers).or_else(|| cookie_token(headers))?;

    match token::decode(raw, keys) {
        Ok(claims) => Some(Session::new(claims.sub, claims.role)),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            None
        }
    }
}

/// Middleware that stores the resolved [`Session`] in request extensions
pub async fn attach_session(
    State(keys): State<SessionKeys>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(session) = resolve(req.headers(), &keys) {
        req.extensions_mut().insert(session);
    }

    next.run(req).await
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .copied()
            .ok_or(SessionRejection::Required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{issue, SessionClaims};
    use axum::http::HeaderValue;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret-key-at-least-32-bytes-long", "storefront")
    }

    fn token_for(user_id: Uuid, role: UserRole) -> String {
        issue(&SessionClaims::new(user_id, role, &keys()), &keys()).unwrap()
    }

    #[test]
    fn test_resolve_from_bearer() {
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token_for(user_id, UserRole::Customer)))
                .unwrap(),
        );

        let session = resolve(&headers, &keys()).unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.role, UserRole::Customer);
    }

    #[test]
    fn test_resolve_from_cookie() {
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!(
                "theme=dark; session={}; cart=abc",
                token_for(user_id, UserRole::Admin)
            ))
            .unwrap(),
        );

        let session = resolve(&headers, &keys()).unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.role, UserRole::Admin);
    }

    #[test]
    fn test_resolve_anonymous() {
        assert!(resolve(&HeaderMap::new(), &keys()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
        assert!(resolve(&headers, &keys()).is_none());
    }

    #[test]
    fn test_require_admin() {
        assert!(Session::new(Uuid::new_v4(), UserRole::Admin).require_admin().is_ok());
        assert_eq!(
            Session::new(Uuid::new_v4(), UserRole::Customer).require_admin(),
            Err(SessionRejection::Forbidden)
        );
    }

    #[test]
    fn test_rejection_status() {
        assert_eq!(
            SessionRejection::Required.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SessionRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
