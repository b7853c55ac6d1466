//! Session oracle: the remote answer to "is this session logged in?".
//!
//! The oracle is one `GET <api>/api/check-auth` carrying the ambient session
//! cookie and no body. Any 2xx status is an authenticated session, any other
//! status is not. Transport failures come back as [`OracleError`] so the
//! guard can log them before failing closed.

#[cfg(test)]
#[path = "oracle_test.rs"]
mod oracle_test;

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

use crate::config::NavConfig;
use crate::types::SessionVerdict;

/// Path of the session check endpoint, relative to the API base.
pub const CHECK_AUTH_PATH: &str = "/api/check-auth";

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("session check request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("session check timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid session cookie header: {0}")]
    InvalidCookie(#[from] reqwest::header::InvalidHeaderValue),
}

/// Provider-neutral async trait for the session check. Enables fakes in tests.
#[async_trait::async_trait]
pub trait SessionOracle: Send + Sync {
    /// Ask whether the current session is authenticated.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] when the oracle cannot be reached.
    async fn check_session(&self) -> Result<SessionVerdict, OracleError>;
}

/// [`SessionOracle`] backed by the real `/api/check-auth` endpoint.
pub struct HttpSessionOracle {
    http: reqwest::Client,
    url: String,
}

impl HttpSessionOracle {
    /// Build an oracle from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cookie is not a valid header value or
    /// the HTTP client fails to build.
    pub fn from_config(config: &NavConfig) -> Result<Self, OracleError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let mut value = HeaderValue::from_str(cookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.auth_timeout)
            .build()?;
        Ok(Self { http, url: check_auth_url(&config.api_url) })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl SessionOracle for HttpSessionOracle {
    async fn check_session(&self) -> Result<SessionVerdict, OracleError> {
        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        tracing::debug!(%status, url = %self.url, "session check answered");
        Ok(verdict_for_status(status))
    }
}

/// Full check-auth URL for an API base, tolerating a trailing slash.
#[must_use]
pub fn check_auth_url(api_url: &str) -> String {
    format!("{}{CHECK_AUTH_PATH}", api_url.trim_end_matches('/'))
}

fn verdict_for_status(status: reqwest::StatusCode) -> SessionVerdict {
    if status.is_success() { SessionVerdict::Authenticated } else { SessionVerdict::Unauthenticated }
}
