use super::*;

#[test]
fn plain_path() {
    let loc = Location::parse("/game").unwrap();
    assert_eq!(loc.path, "/game");
    assert!(loc.query.is_empty());
}

#[test]
fn empty_target_is_root() {
    assert_eq!(Location::parse("").unwrap().path, "/");
}

#[test]
fn relative_target_resolves_from_root() {
    assert_eq!(Location::parse("history").unwrap().path, "/history");
}

#[test]
fn query_and_fragment_are_split_off() {
    let loc = Location::parse("/analysis/42?ply=3&side=white#board").unwrap();
    assert_eq!(loc.path, "/analysis/42");
    assert_eq!(loc.query.get("ply").map(String::as_str), Some("3"));
    assert_eq!(loc.query.get("side").map(String::as_str), Some("white"));
}

#[test]
fn query_values_are_decoded() {
    let loc = Location::parse("/history?opponent=Magnus%20C").unwrap();
    assert_eq!(loc.query.get("opponent").map(String::as_str), Some("Magnus C"));
}

#[test]
fn dot_segments_are_resolved() {
    assert_eq!(Location::parse("/analysis/../game").unwrap().path, "/game");
}

#[test]
fn foreign_origin_is_rejected() {
    assert!(Location::parse("https://elsewhere.test/game").is_none());
}
