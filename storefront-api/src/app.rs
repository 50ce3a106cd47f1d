/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use storefront_api::{app::{build_router, AppState}, config::Config};
/// use storefront_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.pool_settings()).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use storefront_shared::{
    auth::session::attach_session,
    notify::{NotificationSink, PgNotificationSink},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Where action outcomes are recorded
    pub sink: Arc<dyn NotificationSink>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// State recording notifications in the same database
    pub fn new(db: PgPool, config: Config) -> Self {
        let sink = Arc::new(PgNotificationSink::new(db.clone()));
        Self::with_sink(db, sink, config)
    }

    pub fn with_sink(db: PgPool, sink: Arc<dyn NotificationSink>, config: Config) -> Self {
        Self {
            db,
            sink,
            config: Arc::new(config),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials are allowed so the session cookie reaches the API
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health
/// └── /v1/
///     ├── /membership/          GET tiers, progress, history
///     ├── /account/             PUT profile, settings
///     ├── POST /support/tickets
///     ├── POST /experiences
///     ├── /notifications        GET list, POST /read
///     └── /admin/               POST tiers, users/:id/points
/// ```
///
/// The session layer wraps every `/v1` route: it attaches a [`Session`]
/// when the request carries a valid token and lets the request through
/// either way. Handlers decide whether a session is required.
///
/// [`Session`]: storefront_shared::auth::session::Session
pub fn build_router(state: AppState) -> Router {
    let membership_routes = Router::new()
        .route("/tiers", get(routes::membership::list_tiers))
        .route("/progress", get(routes::membership::get_progress))
        .route("/history", get(routes::membership::get_history));

    let account_routes = Router::new()
        .route("/profile", put(routes::account::update_profile))
        .route("/settings", put(routes::account::save_settings));

    let admin_routes = Router::new()
        .route("/tiers", post(routes::admin::create_tier))
        .route("/users/:id/points", post(routes::admin::award_points));

    let v1_routes = Router::new()
        .nest("/membership", membership_routes)
        .nest("/account", account_routes)
        .nest("/admin", admin_routes)
        .route("/support/tickets", post(routes::support::create_ticket))
        .route("/experiences", post(routes::experiences::submit_experience))
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications/read", post(routes::notifications::mark_read))
        .layer(from_fn_with_state(state.config.session_keys(), attach_session));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_any_origin_list() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["https://shop.example.com".to_string(), "not a header\n".to_string()]);
    }
}
