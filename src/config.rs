/*
 * Responsibility
 * - Read environment configuration (PORT, APP_ENV, DATABASE_URL, signing key, body limit)
 * - Refuse to start when a required value is missing or unsafe
 */
use std::fmt;
use std::net::SocketAddr;

use crate::services::auth::SigningKey;

/// Only ever used by debug builds running with APP_ENV=development.
const DEV_SIGNING_KEY: &str = "vehicle-registry-development-signing-key";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        let name = raw.unwrap_or("development").to_ascii_lowercase();
        match name.as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    /// `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub signing_key: SigningKey,
    pub max_body_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database", &self.database_url.as_ref().map(|_| "<set>"))
            .field("signing_key", &self.signing_key)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(non_empty("APP_ENV").as_deref());

        let database_url = non_empty("DATABASE_URL");
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let signing_key = resolve_signing_key(
            non_empty("JWT_SIGNING_KEY").as_deref(),
            app_env,
            cfg!(debug_assertions),
        )?;

        let max_body_bytes = match non_empty("MAX_BODY_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("MAX_BODY_BYTES"))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            signing_key,
            max_body_bytes,
        })
    }
}

/// Pick the token signing key.
///
/// A configured key wins (production requires at least
/// `SigningKey::MIN_PRODUCTION_LEN` bytes). Without one, only a debug build in
/// development may fall back to the built-in key; anything else is fatal.
pub fn resolve_signing_key(
    raw: Option<&str>,
    app_env: AppEnv,
    debug_build: bool,
) -> Result<SigningKey, ConfigError> {
    match raw.filter(|k| !k.is_empty()) {
        Some(key) => {
            if app_env.is_production() && key.len() < SigningKey::MIN_PRODUCTION_LEN {
                return Err(ConfigError::Invalid("JWT_SIGNING_KEY"));
            }
            Ok(SigningKey::new(key))
        }
        None if !app_env.is_production() && debug_build => {
            tracing::warn!("JWT_SIGNING_KEY not set; using the built-in development key");
            Ok(SigningKey::new(DEV_SIGNING_KEY))
        }
        None => Err(ConfigError::Missing("JWT_SIGNING_KEY")),
    }
}
