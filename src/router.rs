//! Router: the navigation state machine.
//!
//! ARCHITECTURE
//! ============
//! `Idle -> Resolving -> Committed`. A request looks up its route, passes the
//! guard, and either commits or re-enters `Resolving` with a successor
//! request (login after a denial or an unmatched path, the redirect target
//! for redirect routes). Route table validation guarantees the successor
//! chain ends on a public view, so every request terminates in `Committed`
//! unless a newer request overtakes it.
//!
//! CONCURRENCY
//! ===========
//! Latest request wins. Each request takes a generation number when it
//! starts; a request whose session check resolves after a newer one has
//! started commits nothing and reports [`NavigationOutcome::Superseded`].
//! Generation bumps and state writes both happen inside the watch channel's
//! write lock, so a stale commit can never land after a newer request has
//! taken over.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::Instrument;

use crate::guard::{DenialReason, GuardVerdict, NavigationGuard};
use crate::oracle::SessionOracle;
use crate::routes::{Location, PathError, RouteTable, RouteTarget};
use crate::types::{NavigationOrigin, NavigationRequest, ResolvedRoute, ViewId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RouterPhase {
    /// Nothing has been navigated to yet.
    #[default]
    Idle,
    Resolving {
        target: String,
    },
    Committed,
}

/// Everything the rendering layer may observe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterState {
    pub phase: RouterPhase,
    /// Last committed route. Replaced whole, never edited in place.
    pub resolved: Option<ResolvedRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested route was committed.
    Committed(ResolvedRoute),
    /// A different route (usually login) was committed instead.
    Redirected(ResolvedRoute),
    /// A newer request started before this one finished; nothing committed.
    Superseded,
}

impl NavigationOutcome {
    /// The committed route, unless superseded.
    #[must_use]
    pub fn route(&self) -> Option<&ResolvedRoute> {
        match self {
            Self::Committed(route) | Self::Redirected(route) => Some(route),
            Self::Superseded => None,
        }
    }
}

pub struct Router {
    table: RouteTable,
    guard: NavigationGuard,
    generation: AtomicU64,
    state: watch::Sender<RouterState>,
}

impl Router {
    /// Router over a validated table, checking sessions with `oracle`.
    #[must_use]
    pub fn new(table: RouteTable, oracle: Arc<dyn SessionOracle>, auth_timeout: Duration) -> Self {
        let guard = NavigationGuard::new(oracle, auth_timeout, table.login_path());
        let (state, _) = watch::channel(RouterState::default());
        Self { table, guard, generation: AtomicU64::new(0), state }
    }

    /// Snapshot of phase and committed route.
    #[must_use]
    pub fn state(&self) -> RouterState {
        self.state.borrow().clone()
    }

    /// The route currently rendered, if any.
    #[must_use]
    pub fn current(&self) -> Option<ResolvedRoute> {
        self.state.borrow().resolved.clone()
    }

    /// Receiver notified on every phase change and commit.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RouterState> {
        self.state.subscribe()
    }

    /// First navigation after page load.
    pub async fn start(&self, initial_path: &str) -> NavigationOutcome {
        self.navigate(NavigationRequest::new(initial_path, NavigationOrigin::InitialLoad))
            .await
    }

    /// User-initiated navigation to `path`.
    pub async fn push(&self, path: &str) -> NavigationOutcome {
        self.navigate(NavigationRequest::new(path, NavigationOrigin::User))
            .await
    }

    /// Navigate to the route rendering `view`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if no route renders `view` or a parameter is
    /// missing. Nothing is navigated in that case.
    pub async fn push_view(
        &self,
        view: ViewId,
        params: &BTreeMap<String, String>,
    ) -> Result<NavigationOutcome, PathError> {
        let path = self.table.path_for(view, params)?;
        Ok(self
            .navigate(NavigationRequest::new(path, NavigationOrigin::Programmatic))
            .await)
    }

    /// Resolve `request` to a committed route.
    pub async fn navigate(&self, request: NavigationRequest) -> NavigationOutcome {
        let span = tracing::info_span!(
            "navigate",
            request_id = %request.id,
            requested = %request.target,
            origin = %request.origin
        );
        self.resolve(request).instrument(span).await
    }

    async fn resolve(&self, request: NavigationRequest) -> NavigationOutcome {
        let generation = self.begin(&request.target);
        let mut current = request;

        loop {
            if !self.mark_resolving(generation, &current.target) {
                return superseded(&current);
            }

            let Some(location) = Location::parse(&current.target) else {
                current = self.deny_unmatched(&current);
                continue;
            };
            let Some(matched) = self.table.lookup(&location.path) else {
                current = self.deny_unmatched(&current);
                continue;
            };

            let view = match &matched.route.target {
                RouteTarget::Redirect(to) => {
                    tracing::debug!(pattern = matched.route.pattern(), to = %to, "redirect route");
                    current = current.redirect_to(to.clone());
                    continue;
                }
                RouteTarget::View(view) => *view,
            };

            match self.guard.authorize(&current, matched.route).await {
                GuardVerdict::Allow => {
                    let route = ResolvedRoute {
                        view,
                        params: matched.params,
                        matched_pattern: matched.route.pattern().to_owned(),
                        path: location.path,
                        query: location.query,
                        redirected_from: current.redirected_from.clone(),
                    };
                    return self.commit(generation, &current, route);
                }
                GuardVerdict::Redirect(to) => current = current.redirect_to(to),
            }
        }
    }

    /// Take a new generation and enter `Resolving`.
    fn begin(&self, target: &str) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.phase = RouterPhase::Resolving { target: target.to_owned() };
        });
        generation
    }

    /// Update the resolving target; false once a newer request has started.
    fn mark_resolving(&self, generation: u64, target: &str) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_latest(generation) {
                return false;
            }
            let phase = RouterPhase::Resolving { target: target.to_owned() };
            if state.phase == phase {
                return false;
            }
            state.phase = phase;
            true
        });
        self.is_latest(generation)
    }

    fn commit(&self, generation: u64, request: &NavigationRequest, route: ResolvedRoute) -> NavigationOutcome {
        let committed = self.state.send_if_modified(|state| {
            if !self.is_latest(generation) {
                return false;
            }
            state.phase = RouterPhase::Committed;
            state.resolved = Some(route.clone());
            true
        });
        if !committed {
            return superseded(request);
        }

        tracing::info!(
            view = %route.view,
            path = %route.path,
            pattern = %route.matched_pattern,
            redirected = route.redirected_from.is_some(),
            "navigation committed"
        );
        if route.redirected_from.is_some() {
            NavigationOutcome::Redirected(route)
        } else {
            NavigationOutcome::Committed(route)
        }
    }

    fn deny_unmatched(&self, request: &NavigationRequest) -> NavigationRequest {
        tracing::info!(
            requested = %request.target,
            reason = DenialReason::UnmatchedRoute.as_str(),
            "no route matched, redirecting to login"
        );
        request.redirect_to(self.table.login_path())
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

fn superseded(request: &NavigationRequest) -> NavigationOutcome {
    tracing::debug!(request_id = %request.id, "navigation superseded by a newer request");
    NavigationOutcome::Superseded
}
