//! Shared navigation types: views, requests, verdicts and resolved routes.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Identifier of a top-level view the rendering layer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewId {
    Login,
    Register,
    Home,
    GameLobby,
    GameHistory,
    GameAnalysis,
}

impl ViewId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Home => "Home",
            Self::GameLobby => "GameLobby",
            Self::GameHistory => "GameHistory",
            Self::GameAnalysis => "GameAnalysis",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What triggered a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationOrigin {
    /// Link click, address bar, back/forward.
    User,
    /// Issued by application code, including guard redirects.
    Programmatic,
    /// First navigation after the page loads.
    InitialLoad,
}

impl fmt::Display for NavigationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Programmatic => "programmatic",
            Self::InitialLoad => "initial-load",
        })
    }
}

/// A single navigation attempt. Immutable; dropped once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Correlates log lines emitted while this request resolves.
    pub id: Uuid,
    pub target: String,
    pub origin: NavigationOrigin,
    /// Path of the request this one replaces, when produced by a redirect.
    pub redirected_from: Option<String>,
}

impl NavigationRequest {
    #[must_use]
    pub fn new(target: impl Into<String>, origin: NavigationOrigin) -> Self {
        Self { id: Uuid::new_v4(), target: target.into(), origin, redirected_from: None }
    }

    /// Successor request sent to `target` instead of this one.
    ///
    /// The first hop's target is kept as `redirected_from` across chained
    /// redirects so the committed route reports where the user was headed.
    #[must_use]
    pub fn redirect_to(&self, target: impl Into<String>) -> Self {
        let redirected_from = self
            .redirected_from
            .clone()
            .unwrap_or_else(|| self.target.clone());
        Self {
            id: Uuid::new_v4(),
            target: target.into(),
            origin: NavigationOrigin::Programmatic,
            redirected_from: Some(redirected_from),
        }
    }
}

/// Answer from the session oracle for one navigation attempt. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionVerdict {
    Authenticated,
    Unauthenticated,
}

impl SessionVerdict {
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// The route the rendering layer should currently show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoute {
    #[serde(rename = "viewId")]
    pub view: ViewId,
    /// Decoded path parameters keyed by name.
    pub params: BTreeMap<String, String>,
    pub matched_pattern: String,
    /// Committed path, without query or fragment.
    pub path: String,
    pub query: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}
