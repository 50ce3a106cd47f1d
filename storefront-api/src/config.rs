/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `APP_ENV`: `production` enables HSTS (default: development)
/// - `SESSION_SECRET`: HMAC key for session tokens (required, 32+ chars)
/// - `SESSION_ISSUER`: Expected token issuer (default: storefront)
/// - `LOG_FORMAT`: `json` or `pretty` (default: pretty)
/// - `RUST_LOG`: Log filter (default: storefront_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use storefront_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use storefront_shared::auth::token::SessionKeys;
use storefront_shared::db::pool::PoolSettings;

/// Minimum accepted length of `SESSION_SECRET`
pub const MIN_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session token configuration
    pub session: SessionConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for HS256 session tokens
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Issuer every accepted token must carry
    pub issuer: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{other}'"),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or `SESSION_SECRET` is missing
    /// - `SESSION_SECRET` is shorter than [`MIN_SECRET_LENGTH`]
    /// - A numeric variable or `LOG_FORMAT` has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        if session_secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!("SESSION_SECRET must be at least {MIN_SECRET_LENGTH} characters long");
        }

        let session_issuer = env::var("SESSION_ISSUER").unwrap_or_else(|_| "storefront".to_string());
        let log_format = LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()))?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret: session_secret,
                issuer: session_issuer,
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Keys used to verify session tokens
    pub fn session_keys(&self) -> SessionKeys {
        SessionKeys::new(self.session.secret.clone(), self.session.issuer.clone())
    }

    /// Pool settings derived from the database section
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.database.max_connections,
            ..PoolSettings::for_url(self.database.url.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 4,
            },
            session: SessionConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                issuer: "storefront-test".to_string(),
            },
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_session_keys_and_pool_settings() {
        let config = test_config();

        let keys = config.session_keys();
        assert_eq!(keys.issuer, "storefront-test");

        let settings = config.pool_settings();
        assert_eq!(settings.url, "postgresql://localhost/test");
        assert_eq!(settings.max_connections, 4);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://shop.example.com, https://admin.example.com,"),
            vec!["https://shop.example.com", "https://admin.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty").unwrap(), LogFormat::Pretty);
        assert!(LogFormat::parse("xml").is_err());
    }
}
