//! Application configuration module
//!
//! Builds the [`Settings`] object once at startup from environment variables.
//! Handlers never read the environment; everything they need is carried in
//! the shared state.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// Admin secret used when `ADMIN_SECRET` is not set
pub const DEFAULT_ADMIN_SECRET: &str = "supersecret";

/// Work factor bounds accepted by bcrypt
pub const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to parse {name}: {value:?}")]
    ParseError { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
        }
    }
}

/// Database configuration, present only when `DATABASE_URL` is set
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub require_tls: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

/// Shared-secret settings for the admin endpoints
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub secret: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_ADMIN_SECRET.to_string(),
        }
    }
}

/// Upload and static asset locations
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            public_dir: PathBuf::from("public"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Password hashing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { bcrypt_cost: 10 }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: Option<DatabaseConfig>,
    pub cors: CorsConfig,
    pub admin: AdminConfig,
    pub assets: AssetsConfig,
    pub auth: AuthConfig,
    pub log_format: LogFormat,
}

impl Settings {
    /// Load settings from the process environment (and `.env` if present)
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let defaults = Settings::default();

        let server = ServerConfig {
            host: parse_or(get("HOST"), "HOST", defaults.server.host)?,
            port: parse_or(get("PORT"), "PORT", defaults.server.port)?,
        };

        let max_pool_size = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?;
        let database = get("DATABASE_URL")
            .map(|url| Self::parse_database_url(&url, max_pool_size))
            .transpose()?;

        let cors = CorsConfig {
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };

        let admin = AdminConfig {
            secret: get("ADMIN_SECRET").unwrap_or(defaults.admin.secret),
        };

        let assets = AssetsConfig {
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.assets.upload_dir),
            public_dir: get("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.assets.public_dir),
            max_upload_bytes: parse_or(
                get("UPLOAD_MAX_BYTES"),
                "UPLOAD_MAX_BYTES",
                defaults.assets.max_upload_bytes,
            )?,
        };

        let bcrypt_cost = parse_or(get("BCRYPT_COST"), "BCRYPT_COST", defaults.auth.bcrypt_cost)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Ok(Self {
            server,
            database,
            cors,
            admin,
            assets,
            auth: AuthConfig { bcrypt_cost },
            log_format,
        })
    }

    /// Whether the admin secret was left at the built-in default
    pub fn uses_default_admin_secret(&self) -> bool {
        self.admin.secret == DEFAULT_ADMIN_SECRET
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str, max_pool_size: usize) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(ConfigError::InvalidValue(format!(
                "Unsupported DATABASE_URL scheme: {}",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let database = parsed.path().trim_start_matches('/').to_string();
        if database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "Missing database name in DATABASE_URL".to_string(),
            ));
        }

        // Hosted providers such as Neon only accept TLS
        let require_tls = host.contains("neon.tech")
            || parsed
                .query_pairs()
                .any(|(k, v)| k == "sslmode" && v == "require");

        Ok(DatabaseConfig {
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            host,
            database,
            max_pool_size,
            require_tls,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.parse().map_err(|_| ConfigError::ParseError { name, value: v }),
        None => Ok(default),
    }
}
