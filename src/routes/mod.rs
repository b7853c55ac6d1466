//! Route table.
//!
//! DESIGN
//! ======
//! Routes are matched in declaration order and the first match wins. The
//! table is validated once when built so the router can rely on two facts
//! at runtime: the login path always lands on a public view, and every
//! redirect lands on a view in a single hop. Together these make the
//! redirect loop in [`crate::router`] terminate.

pub mod location;
pub mod pattern;


use std::collections::BTreeMap;

pub use location::Location;
pub use pattern::{PathPattern, PatternIssue};

use crate::types::ViewId;

/// Default path of the login view.
pub const LOGIN_PATH: &str = "/login";

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("invalid route pattern `{pattern}`: {}", .issue.describe())]
    InvalidPattern { pattern: String, issue: PatternIssue },
    #[error("catch-all route `{pattern}` must be the last route")]
    CatchAllNotLast { pattern: String },
    #[error("login path `{path}` does not resolve to a view")]
    LoginUnroutable { path: String },
    #[error("login route `{pattern}` must not require authentication")]
    LoginRequiresAuth { pattern: String },
    #[error("redirect `{pattern}` -> `{target}` does not resolve to a view")]
    DanglingRedirect { pattern: String, target: String },
    #[error("redirect route `{pattern}` must not require authentication")]
    RedirectRequiresAuth { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("no route renders view {0}")]
    UnknownView(ViewId),
    #[error("missing parameter `{name}` for route `{pattern}`")]
    MissingParam { pattern: String, name: String },
}

// =============================================================================
// DEFINITIONS
// =============================================================================

/// What a matched route leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    View(ViewId),
    /// Navigate to this path instead.
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pattern: PathPattern,
    pub target: RouteTarget,
    pub requires_auth: bool,
}

impl RouteDefinition {
    /// # Errors
    ///
    /// Returns [`RouteTableError::InvalidPattern`] if `pattern` does not parse.
    pub fn new(pattern: &str, target: RouteTarget, requires_auth: bool) -> Result<Self, RouteTableError> {
        let pattern = PathPattern::parse(pattern)
            .map_err(|issue| RouteTableError::InvalidPattern { pattern: pattern.to_owned(), issue })?;
        Ok(Self { pattern, target, requires_auth })
    }

    /// Route rendering `view`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError::InvalidPattern`] if `pattern` does not parse.
    pub fn view(pattern: &str, view: ViewId, requires_auth: bool) -> Result<Self, RouteTableError> {
        Self::new(pattern, RouteTarget::View(view), requires_auth)
    }

    /// Public route that forwards to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError::InvalidPattern`] if `pattern` does not parse.
    pub fn redirect(pattern: &str, to: &str) -> Result<Self, RouteTableError> {
        Self::new(pattern, RouteTarget::Redirect(to.to_owned()), false)
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// A definition matched against a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDefinition,
    pub params: BTreeMap<String, String>,
}

// =============================================================================
// TABLE
// =============================================================================

/// Ordered, validated, immutable list of routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
    login_path: String,
}

impl RouteTable {
    /// Build and validate a table.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteTableError`] if a catch-all is not last, the login
    /// path does not land on a public view, or a redirect does not land on
    /// a view.
    pub fn new(routes: Vec<RouteDefinition>, login_path: &str) -> Result<Self, RouteTableError> {
        let table = Self { routes, login_path: login_path.to_owned() };
        table.validate()?;
        Ok(table)
    }

    /// The chess application's route table.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in declarations are themselves invalid.
    pub fn app() -> Result<Self, RouteTableError> {
        Self::new(
            vec![
                RouteDefinition::view(LOGIN_PATH, ViewId::Login, false)?,
                RouteDefinition::view("/register", ViewId::Register, false)?,
                RouteDefinition::view("/", ViewId::Home, true)?,
                RouteDefinition::view("/game", ViewId::GameLobby, true)?,
                RouteDefinition::view("/history", ViewId::GameHistory, true)?,
                RouteDefinition::view("/analysis/:gameId", ViewId::GameAnalysis, true)?,
                RouteDefinition::redirect("/:pathMatch(.*)*", LOGIN_PATH)?,
            ],
            LOGIN_PATH,
        )
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// First definition matching `path`, or `None` when nothing matches.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.matches(path).map(|params| RouteMatch { route, params }))
    }

    /// Concrete path of the first route rendering `view`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if no route renders `view` or a parameter is
    /// missing.
    pub fn path_for(&self, view: ViewId, params: &BTreeMap<String, String>) -> Result<String, PathError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.target == RouteTarget::View(view))
            .ok_or(PathError::UnknownView(view))?;
        route
            .pattern
            .build(params)
            .map_err(|missing| PathError::MissingParam { pattern: route.pattern().to_owned(), name: missing.0 })
    }

    fn validate(&self) -> Result<(), RouteTableError> {
        let last = self.routes.len().saturating_sub(1);
        for (i, route) in self.routes.iter().enumerate() {
            if route.pattern.is_catch_all() && i != last {
                return Err(RouteTableError::CatchAllNotLast { pattern: route.pattern().to_owned() });
            }
        }

        let login = self
            .lookup_location(&self.login_path)
            .ok_or_else(|| RouteTableError::LoginUnroutable { path: self.login_path.clone() })?;
        if !matches!(login.route.target, RouteTarget::View(_)) {
            return Err(RouteTableError::LoginUnroutable { path: self.login_path.clone() });
        }
        if login.route.requires_auth {
            return Err(RouteTableError::LoginRequiresAuth { pattern: login.route.pattern().to_owned() });
        }

        for route in &self.routes {
            let RouteTarget::Redirect(target) = &route.target else {
                continue;
            };
            if route.requires_auth {
                return Err(RouteTableError::RedirectRequiresAuth { pattern: route.pattern().to_owned() });
            }
            let lands_on_view = self
                .lookup_location(target)
                .is_some_and(|m| matches!(m.route.target, RouteTarget::View(_)));
            if !lands_on_view {
                return Err(RouteTableError::DanglingRedirect {
                    pattern: route.pattern().to_owned(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    fn lookup_location(&self, target: &str) -> Option<RouteMatch<'_>> {
        let location = Location::parse(target)?;
        self.lookup(&location.path)
    }
}
