//! Navigation configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::time::Duration;

pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    /// API base the session check is sent to, without trailing slash.
    pub api_url: String,
    /// Upper bound on one session check; expiry counts as not logged in.
    pub auth_timeout: Duration,
    /// Cookie header value sent with the session check when running outside
    /// a browser.
    pub session_cookie: Option<String>,
}

impl NavConfig {
    /// Build typed navigation config from environment variables.
    ///
    /// Required:
    /// - `CHESS_API_URL`: absolute `http`/`https` base URL
    ///
    /// Optional:
    /// - `CHESS_AUTH_TIMEOUT_MS`: default 10000, must be positive
    /// - `CHESS_SESSION_COOKIE`: e.g. `session_token=...`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the API URL is missing or malformed, the
    /// timeout is not a positive integer, or any variable is not Unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env_var("CHESS_API_URL")?.unwrap_or_default();
        let auth_timeout_ms = match env_var("CHESS_AUTH_TIMEOUT_MS")? {
            Some(raw) => parse_timeout_ms(&raw)?,
            None => DEFAULT_AUTH_TIMEOUT_MS,
        };
        let session_cookie = env_var("CHESS_SESSION_COOKIE")?;
        Self::build(&api_url, auth_timeout_ms, session_cookie.as_deref())
    }

    /// Validate raw values into a config. Blank cookies count as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the API URL is blank or malformed, or
    /// the timeout is zero.
    pub fn build(api_url: &str, auth_timeout_ms: u64, session_cookie: Option<&str>) -> Result<Self, ConfigError> {
        if api_url.trim().is_empty() {
            return Err(ConfigError::Missing { var: "CHESS_API_URL" });
        }
        if auth_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "CHESS_AUTH_TIMEOUT_MS",
                reason: "must be greater than zero".into(),
            });
        }
        let session_cookie = session_cookie
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            auth_timeout: Duration::from_millis(auth_timeout_ms),
            session_cookie,
        })
    }
}

/// `None` when unset; non-Unicode values are rejected rather than ignored.
fn env_var(var: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::Invalid { var, reason: "not valid Unicode".into() }),
    }
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::Invalid { var: "CHESS_API_URL", reason: e.to_string() })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            var: "CHESS_API_URL",
            reason: format!("unsupported scheme '{}' (expected 'http' or 'https')", url.scheme()),
        });
    }
    Ok(trimmed.to_owned())
}

fn parse_timeout_ms(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::Invalid { var: "CHESS_AUTH_TIMEOUT_MS", reason: e.to_string() })
}
