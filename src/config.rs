use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::services::admission_service::AdmissionPolicy;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;
const DEFAULT_SESSION_TITLE: &str = "Volleyball Friday";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set (see .env)")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admission_policy: AdmissionPolicy,
    pub session_ttl: Duration,
    pub share_phone: Option<String>,
    pub session_title: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let admission_policy = match get("ADMISSION_POLICY") {
            Some(raw) => AdmissionPolicy::parse(&raw).ok_or(ConfigError::Invalid {
                name: "ADMISSION_POLICY",
                value: raw,
            })?,
            None => AdmissionPolicy::default(),
        };

        let session_ttl_secs = match get("SESSION_TTL_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "SESSION_TTL_SECS",
                value: raw,
            })?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(AppConfig {
            database_url,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            admission_policy,
            session_ttl: Duration::from_secs(session_ttl_secs),
            share_phone: get("SHARE_PHONE"),
            session_title: get("SESSION_TITLE").unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
        })
    }

    /// Port tried when `port` is taken. `None` when `port` is the last one.
    pub fn fallback_port(&self) -> Option<u16> {
        self.port.checked_add(1)
    }
}
