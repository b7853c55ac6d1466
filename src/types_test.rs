use super::*;

// =============================================================
// NavigationRequest
// =============================================================

#[test]
fn new_request_has_no_redirect_source() {
    let req = NavigationRequest::new("/game", NavigationOrigin::User);
    assert_eq!(req.target, "/game");
    assert_eq!(req.origin, NavigationOrigin::User);
    assert!(req.redirected_from.is_none());
}

#[test]
fn requests_get_distinct_ids() {
    let a = NavigationRequest::new("/", NavigationOrigin::User);
    let b = NavigationRequest::new("/", NavigationOrigin::User);
    assert_ne!(a.id, b.id);
}

#[test]
fn redirect_records_source_and_becomes_programmatic() {
    let req = NavigationRequest::new("/history", NavigationOrigin::InitialLoad);
    let next = req.redirect_to("/login");
    assert_eq!(next.target, "/login");
    assert_eq!(next.origin, NavigationOrigin::Programmatic);
    assert_eq!(next.redirected_from.as_deref(), Some("/history"));
    assert_ne!(next.id, req.id);
}

#[test]
fn chained_redirect_keeps_first_source() {
    let req = NavigationRequest::new("/nowhere", NavigationOrigin::User);
    let hop = req.redirect_to("/login").redirect_to("/login");
    assert_eq!(hop.redirected_from.as_deref(), Some("/nowhere"));
}

// =============================================================
// Display / serde
// =============================================================

#[test]
fn origin_display_is_kebab_case() {
    assert_eq!(NavigationOrigin::InitialLoad.to_string(), "initial-load");
    assert_eq!(NavigationOrigin::Programmatic.to_string(), "programmatic");
    assert_eq!(NavigationOrigin::User.to_string(), "user");
}

#[test]
fn view_display_matches_name() {
    assert_eq!(ViewId::GameAnalysis.to_string(), "GameAnalysis");
    assert_eq!(ViewId::Login.as_str(), "Login");
}

#[test]
fn verdict_is_authenticated() {
    assert!(SessionVerdict::Authenticated.is_authenticated());
    assert!(!SessionVerdict::Unauthenticated.is_authenticated());
}

#[test]
fn resolved_route_serializes_camel_case() {
    let route = ResolvedRoute {
        view: ViewId::GameAnalysis,
        params: BTreeMap::from([("gameId".to_owned(), "42".to_owned())]),
        matched_pattern: "/analysis/:gameId".into(),
        path: "/analysis/42".into(),
        query: BTreeMap::new(),
        redirected_from: None,
    };
    let json = serde_json::to_value(&route).unwrap();
    assert_eq!(json["viewId"], "GameAnalysis");
    assert!(json.get("view").is_none());
    assert_eq!(json["params"]["gameId"], "42");
    assert_eq!(json["matchedPattern"], "/analysis/:gameId");
    assert!(json.get("redirectedFrom").is_none());
}
