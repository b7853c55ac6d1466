//! Navigation guard.
//!
//! DESIGN
//! ======
//! The guard is asked once per navigation attempt and answers with a value
//! instead of invoking a continuation. Public routes are allowed without
//! touching the network. Protected routes cost exactly one oracle call,
//! bounded by the configured timeout; there are no retries and no cached
//! verdicts.
//!
//! ERROR HANDLING
//! ==============
//! Fail-closed. A rejected session, an unreachable oracle and an expired
//! timeout all produce the same redirect to login. The distinction only
//! shows up in the `reason` field of the log line.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;
use std::time::Duration;

use crate::oracle::{OracleError, SessionOracle};
use crate::routes::RouteDefinition;
use crate::types::{NavigationRequest, SessionVerdict};

/// Decision for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Allow,
    /// Go to this path (the login route) instead.
    Redirect(String),
}

/// Why a navigation was sent to login. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    UnmatchedRoute,
    Unauthorized,
    OracleUnreachable,
    OracleTimeout,
}

impl DenialReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnmatchedRoute => "unmatched_route",
            Self::Unauthorized => "unauthorized",
            Self::OracleUnreachable => "oracle_unreachable",
            Self::OracleTimeout => "oracle_timeout",
        }
    }
}

pub struct NavigationGuard {
    oracle: Arc<dyn SessionOracle>,
    timeout: Duration,
    login_path: String,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(oracle: Arc<dyn SessionOracle>, timeout: Duration, login_path: impl Into<String>) -> Self {
        Self { oracle, timeout, login_path: login_path.into() }
    }

    /// Decide whether `request` may enter `route`.
    pub async fn authorize(&self, request: &NavigationRequest, route: &RouteDefinition) -> GuardVerdict {
        if !route.requires_auth {
            tracing::debug!(request_id = %request.id, pattern = route.pattern(), "public route, no session check");
            return GuardVerdict::Allow;
        }

        match self.check().await {
            Ok(()) => {
                tracing::debug!(request_id = %request.id, pattern = route.pattern(), "session check passed");
                GuardVerdict::Allow
            }
            Err(reason) => {
                tracing::info!(
                    request_id = %request.id,
                    requested = %request.target,
                    reason = reason.as_str(),
                    "navigation denied, redirecting to login"
                );
                GuardVerdict::Redirect(self.login_path.clone())
            }
        }
    }

    async fn check(&self) -> Result<(), DenialReason> {
        let outcome = tokio::time::timeout(self.timeout, self.oracle.check_session())
            .await
            .map_err(|_| OracleError::Timeout(self.timeout));

        match outcome {
            Ok(Ok(SessionVerdict::Authenticated)) => Ok(()),
            Ok(Ok(SessionVerdict::Unauthenticated)) => Err(DenialReason::Unauthorized),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "session oracle unreachable");
                Err(DenialReason::OracleUnreachable)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session oracle timed out");
                Err(DenialReason::OracleTimeout)
            }
        }
    }
}
