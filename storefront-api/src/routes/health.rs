/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "schema_version": 20250101000005
/// }
/// ```
///
/// A database that cannot be reached reports `"degraded"` with status 200,
/// so load balancers can tell a running process from a dead one.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use storefront_shared::db::{migrations, pool};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Latest applied migration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let (database, schema_version) = match pool::health_check(&state.db).await {
        Ok(()) => {
            let version = migrations::migration_status(&state.db)
                .await
                .ok()
                .and_then(|status| status.latest_version);
            ("connected", version)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ("disconnected", None)
        }
    };

    Ok(Json(HealthResponse {
        status: if database == "connected" { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        schema_version,
    }))
}
