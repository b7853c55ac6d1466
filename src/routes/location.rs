//! Normalization of navigation targets into a path and decoded query.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use std::collections::BTreeMap;

use url::Url;

/// Synthetic origin used to resolve relative targets. Only paths on this
/// origin are routable.
const APP_ORIGIN: &str = "http://app.invalid/";

/// A navigation target split into its routable parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Percent-encoded path with dot segments resolved.
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl Location {
    /// Parse a target such as `/analysis/42?ply=3#board`.
    ///
    /// Returns `None` for targets that point off the application origin
    /// (e.g. `https://elsewhere.test/game`) or cannot be parsed at all.
    #[must_use]
    pub fn parse(target: &str) -> Option<Self> {
        let Ok(base) = Url::parse(APP_ORIGIN) else {
            return None;
        };
        let Ok(url) = base.join(target) else {
            return None;
        };
        if url.origin() != base.origin() {
            return None;
        }

        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Some(Self { path: url.path().to_owned(), query })
    }
}
