/// PostgreSQL connection pool
///
/// Builds the `sqlx` pool shared by every request handler and verifies
/// connectivity before the server starts accepting traffic.
///
/// # Example
///
/// ```no_run
/// use storefront_shared::db::pool::{create_pool, PoolSettings};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let settings = PoolSettings::for_url("postgresql://storefront@localhost/storefront");
/// let pool = create_pool(&settings).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings for the storefront connection pool
///
/// Timeouts are whole seconds so they can be read straight from the environment.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// PostgreSQL connection URL
    pub url: String,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// Connections kept warm while idle
    pub min_connections: u32,

    /// How long a handler waits for a free connection (seconds)
    pub acquire_timeout_seconds: u64,

    /// Idle connections older than this are closed (seconds)
    pub idle_timeout_seconds: Option<u64>,

    /// Connections are recycled after this lifetime (seconds)
    pub max_lifetime_seconds: Option<u64>,
}

impl PoolSettings {
    /// Default settings pointed at `url`
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
        }
    }
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    let mut options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds));

    if let Some(idle) = settings.idle_timeout_seconds {
        options = options.idle_timeout(Duration::from_secs(idle));
    }
    if let Some(lifetime) = settings.max_lifetime_seconds {
        options = options.max_lifetime(Duration::from_secs(lifetime));
    }

    options
}

/// Connects the pool and runs a health check
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable,
/// or the health check query fails.
pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "Creating database connection pool"
    );

    let pool = pool_options(settings).connect(&settings.url).await?;
    health_check(&pool).await?;

    info!("Database connection pool ready");
    Ok(pool)
}

/// Builds a pool that connects on first use
///
/// Used by tests that exercise routes which never reach the database.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed.
pub fn create_lazy_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    debug!("Creating lazy database connection pool");
    pool_options(settings)
        .min_connections(0)
        .connect_lazy(&settings.url)
}

/// Runs `SELECT 1` against the pool
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (value,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if value == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!(value, "Database health check returned unexpected value");
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Closes every connection in the pool
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
