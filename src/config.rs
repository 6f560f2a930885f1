// config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenv::dotenv;
use thiserror::Error;

/// Configuration errors raised while reading the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Error when an environment variable holds an unusable value
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Longest accepted login token lifetime (one year)
const MAX_SESSION_TTL_HOURS: i64 = 8760;

/// Runtime settings of the chat service
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// HMAC secret used to sign login tokens
    pub jwt_secret: String,
    /// Lifetime of a login token, in hours
    pub session_ttl_hours: i64,
    /// Project-wide static root, holds `project_wide.txt`
    pub static_dir: PathBuf,
    /// App static root, holds `example.txt`
    pub app_static_dir: PathBuf,
}

impl Settings {
    /// Loads `.env` (if present) and reads every setting from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET_KEY")
            .map_err(|_| ConfigError::EnvVarNotFound("JWT_SECRET_KEY".to_string()))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET_KEY".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            bind_addr: parse_var("BIND_ADDR", "0.0.0.0:3000")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            session_ttl_hours: check_session_ttl(parse_var("SESSION_TTL_HOURS", "24")?)?,
            static_dir: var_or("STATICFILES_DIR", "static").into(),
            app_static_dir: var_or("APP_STATIC_DIR", "chat/static/chat").into(),
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var_or(name, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn check_session_ttl(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::InvalidValue {
            name: "SESSION_TTL_HOURS".to_string(),
            reason: format!("must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}"),
        })
    }
}
