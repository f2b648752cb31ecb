//! Server configuration from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use articles_store::StoreConfig;

/// Default access token lifetime.
pub const DEFAULT_ACCESS_EXPIRES: &str = "15m";

/// Default refresh token lifetime.
pub const DEFAULT_REFRESH_EXPIRES: &str = "7d";

/// Default TTL for cached articles and article lists.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Which article/user store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Which cache backs the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// JWT signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// Access token lifetime.
    pub access_expires: Duration,
    /// HMAC secret for refresh tokens.
    pub refresh_secret: String,
    /// Refresh token lifetime.
    pub refresh_expires: Duration,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("access_expires", &self.access_expires)
            .field("refresh_secret", &"<redacted>")
            .field("refresh_expires", &self.refresh_expires)
            .finish()
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Store backend.
    pub store_backend: StoreBackend,
    /// Pool settings, present only for the postgres backend.
    pub database: Option<StoreConfig>,
    /// Cache backend.
    pub cache_backend: CacheBackend,
    /// Redis connection URL.
    pub redis_url: String,
    /// TTL applied to every cache entry.
    pub cache_ttl: Duration,
    /// Token signing configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `JWT_ACCESS_SECRET`, `JWT_REFRESH_SECRET`: token signing secrets
    /// - `DATABASE_URL`: when `STORE_BACKEND` is `postgres`, along with the
    ///   optional `DATABASE_*` pool settings read by [`StoreConfig`]
    ///
    /// Optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `LOG_FORMAT`: "text" or "json" (default: "text")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `STORE_BACKEND`: "postgres" or "memory" (default: "postgres")
    /// - `CACHE_BACKEND`: "memory" or "redis" (default: "memory")
    /// - `REDIS_URL`: (default: "redis://127.0.0.1:6379")
    /// - `ARTICLES_CACHE_TTL_SECS`: positive seconds (default: 60)
    /// - `JWT_ACCESS_EXPIRES`: (default: "15m")
    /// - `JWT_REFRESH_EXPIRES`: (default: "7d")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let port = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                reason: format!("not a port number: {}", s),
            })?,
            None => 3000,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "LOG_FORMAT".to_string(),
                    reason: format!("expected text or json, got {}", other),
                });
            }
        };

        let cors_allowed_origins =
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "STORE_BACKEND".to_string(),
                    reason: format!("expected postgres or memory, got {}", other),
                });
            }
        };

        let database = match store_backend {
            StoreBackend::Postgres => Some(
                StoreConfig::from_lookup(|name| lookup(name))
                    .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            ),
            StoreBackend::Memory => None,
        };

        let cache_backend = match lookup("CACHE_BACKEND").as_deref() {
            None | Some("memory") => CacheBackend::Memory,
            Some("redis") => CacheBackend::Redis,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "CACHE_BACKEND".to_string(),
                    reason: format!("expected memory or redis, got {}", other),
                });
            }
        };

        let redis_url =
            lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());

        let cache_ttl = match lookup("ARTICLES_CACHE_TTL_SECS") {
            Some(s) => match s.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "ARTICLES_CACHE_TTL_SECS".to_string(),
                        reason: format!("expected a positive number of seconds, got {}", s),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };

        let expires = |name: &str, default: &str| {
            let value = lookup(name).unwrap_or_else(|| default.to_string());
            parse_duration(&value).ok_or_else(|| ConfigError::InvalidValue {
                name: name.to_string(),
                reason: format!("expected a duration like 15m or 7d, got {}", value),
            })
        };

        let jwt = JwtConfig {
            access_secret: required("JWT_ACCESS_SECRET")?,
            access_expires: expires("JWT_ACCESS_EXPIRES", DEFAULT_ACCESS_EXPIRES)?,
            refresh_secret: required("JWT_REFRESH_SECRET")?,
            refresh_expires: expires("JWT_REFRESH_EXPIRES", DEFAULT_REFRESH_EXPIRES)?,
        };

        Ok(Self {
            port,
            log_level,
            log_format,
            cors_allowed_origins,
            store_backend,
            database,
            cache_backend,
            redis_url,
            cache_ttl,
            jwt,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Parse a token lifetime: `<n>s`, `<n>m`, `<n>h`, `<n>d`, or bare seconds.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&value[..idx], c),
        _ => (value, 's'),
    };

    let n: u64 = digits.parse().ok()?;
    let secs = match unit {
        's' => n,
        'm' => n.checked_mul(60)?,
        'h' => n.checked_mul(60 * 60)?,
        'd' => n.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
