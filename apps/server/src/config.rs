use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use eventgen_lookup::{LookupSettings, RetryPolicy};

#[derive(Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub er_enabled: bool,
    pub er_url: String,
    pub er_timeout: Duration,
    pub er_retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            er_enabled: false,
            er_url: String::new(),
            er_timeout: Duration::from_millis(5000),
            er_retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable source; unset keys keep
    /// their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let listen_addr = parse_or(&var, "EG_LISTEN_ADDR", defaults.listen_addr)?;
        let cors_allow = match var("EG_CORS_ALLOW_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_allow,
        };
        let request_timeout_ms: u64 = parse_or(&var, "EG_REQUEST_TIMEOUT_MS", 30000)?;
        let er_enabled: bool = parse_or(&var, "EG_ER_ENABLED", false)?;
        let er_url = var("EG_ER_URL").unwrap_or_default().trim().to_string();
        let er_timeout_ms: u64 = parse_or(&var, "EG_ER_TIMEOUT_MS", 5000)?;
        let max_attempts: u32 = parse_or(&var, "EG_ER_MAX_ATTEMPTS", defaults.er_retry.max_attempts)?;
        let backoff_ms: u64 = parse_or(&var, "EG_ER_BACKOFF_MS", 0)?;

        if er_enabled && er_url.is_empty() {
            bail!("EG_ER_URL must be set when EG_ER_ENABLED is true");
        }

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(request_timeout_ms),
            er_enabled,
            er_url,
            er_timeout: Duration::from_millis(er_timeout_ms),
            er_retry: RetryPolicy {
                max_attempts,
                backoff: Duration::from_millis(backoff_ms),
            },
        })
    }

    pub fn lookup_settings(&self) -> LookupSettings {
        LookupSettings {
            enabled: self.er_enabled,
            base_url: self.er_url.clone(),
        }
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
