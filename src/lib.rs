//! # chess-nav
//!
//! Client-side navigation layer for the chess application: a declarative
//! route table, a session guard backed by the `/api/check-auth` endpoint,
//! and the router state machine that commits or redirects every navigation.
//!
//! DESIGN
//! ======
//! Everything resolves to a view. Unmatched paths, missing sessions and
//! unreachable auth services all end on the login route; the reason is only
//! visible in the logs.

pub mod config;
pub mod guard;
pub mod oracle;
pub mod router;
pub mod routes;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, NavConfig};
pub use guard::{GuardVerdict, NavigationGuard};
pub use oracle::{HttpSessionOracle, OracleError, SessionOracle};
pub use router::{NavigationOutcome, Router, RouterPhase, RouterState};
pub use routes::{RouteDefinition, RouteTable, RouteTableError, RouteTarget};
pub use types::{NavigationOrigin, NavigationRequest, ResolvedRoute, SessionVerdict, ViewId};
