use super::*;
use crate::routes::RouteTarget;
use crate::testing::{FakeOracle, Step};
use crate::types::{NavigationOrigin, ViewId};

const TIMEOUT: Duration = Duration::from_secs(5);

fn public_route() -> RouteDefinition {
    RouteDefinition::view("/login", ViewId::Login, false).unwrap()
}

fn protected_route() -> RouteDefinition {
    RouteDefinition::view("/game", ViewId::GameLobby, true).unwrap()
}

fn request(target: &str) -> NavigationRequest {
    NavigationRequest::new(target, NavigationOrigin::User)
}

fn guard(oracle: Arc<FakeOracle>) -> NavigationGuard {
    NavigationGuard::new(oracle, TIMEOUT, "/login")
}

// =============================================================================
// public routes
// =============================================================================

#[tokio::test]
async fn public_route_allows_without_oracle_call() {
    let oracle = FakeOracle::always(SessionVerdict::Unauthenticated);
    let verdict = guard(oracle.clone()).authorize(&request("/login"), &public_route()).await;
    assert_eq!(verdict, GuardVerdict::Allow);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn public_redirect_route_allows_without_oracle_call() {
    let oracle = FakeOracle::always(SessionVerdict::Unauthenticated);
    let route = RouteDefinition::redirect("/*", "/login").unwrap();
    assert_eq!(route.target, RouteTarget::Redirect("/login".into()));
    let verdict = guard(oracle.clone()).authorize(&request("/x"), &route).await;
    assert_eq!(verdict, GuardVerdict::Allow);
    assert_eq!(oracle.calls(), 0);
}

// =============================================================================
// protected routes
// =============================================================================

#[tokio::test]
async fn authenticated_session_allows() {
    let oracle = FakeOracle::always(SessionVerdict::Authenticated);
    let verdict = guard(oracle.clone()).authorize(&request("/game"), &protected_route()).await;
    assert_eq!(verdict, GuardVerdict::Allow);
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn unauthenticated_session_redirects_to_login() {
    let oracle = FakeOracle::always(SessionVerdict::Unauthenticated);
    let verdict = guard(oracle.clone()).authorize(&request("/game"), &protected_route()).await;
    assert_eq!(verdict, GuardVerdict::Redirect("/login".into()));
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn transport_failure_redirects_without_retry() {
    let oracle = FakeOracle::scripted(vec![Step::Fail, Step::Answer(SessionVerdict::Authenticated)]);
    let verdict = guard(oracle.clone()).authorize(&request("/game"), &protected_route()).await;
    assert_eq!(verdict, GuardVerdict::Redirect("/login".into()));
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn hung_oracle_times_out_and_redirects() {
    let oracle = FakeOracle::scripted(vec![Step::Hang]);
    let started = tokio::time::Instant::now();
    let verdict = guard(oracle.clone()).authorize(&request("/game"), &protected_route()).await;
    assert_eq!(verdict, GuardVerdict::Redirect("/login".into()));
    assert_eq!(oracle.calls(), 1);
    assert!(started.elapsed() >= TIMEOUT);
}

#[tokio::test]
async fn every_attempt_queries_afresh() {
    let oracle = FakeOracle::scripted(vec![
        Step::Answer(SessionVerdict::Authenticated),
        Step::Answer(SessionVerdict::Unauthenticated),
    ]);
    let guard = guard(oracle.clone());
    let route = protected_route();
    assert_eq!(guard.authorize(&request("/game"), &route).await, GuardVerdict::Allow);
    assert_eq!(guard.authorize(&request("/game"), &route).await, GuardVerdict::Redirect("/login".into()));
    assert_eq!(oracle.calls(), 2);
}

#[test]
fn denial_reasons_have_stable_names() {
    assert_eq!(DenialReason::UnmatchedRoute.as_str(), "unmatched_route");
    assert_eq!(DenialReason::Unauthorized.as_str(), "unauthorized");
    assert_eq!(DenialReason::OracleUnreachable.as_str(), "oracle_unreachable");
    assert_eq!(DenialReason::OracleTimeout.as_str(), "oracle_timeout");
}
