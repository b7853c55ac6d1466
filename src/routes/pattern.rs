//! Path patterns: parsing, matching and building concrete paths.
//!
//! Supported segments:
//! - literal (`game`), compared case-insensitively after percent-decoding
//! - named parameter (`:gameId`), never matches an empty segment
//! - terminal wildcard (`*`, `*rest`, or `:rest(.*)*`), matches any remainder

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when a parameter value is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal { text: String, folded: String },
    Param(String),
    Wildcard(Option<String>),
}

/// A parsed route pattern such as `/analysis/:gameId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Why a pattern string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternIssue {
    MissingLeadingSlash,
    EmptySegment,
    EmptyParamName,
    InvalidParamName,
    DuplicateParam,
    UnsupportedRegex,
    WildcardNotTerminal,
}

impl PatternIssue {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::MissingLeadingSlash => "must start with `/`",
            Self::EmptySegment => "contains an empty segment",
            Self::EmptyParamName => "parameter name is empty",
            Self::InvalidParamName => "parameter names may only use ASCII letters, digits and `_`",
            Self::DuplicateParam => "parameter name is used twice",
            Self::UnsupportedRegex => "only the `(.*)*` catch-all regex is supported",
            Self::WildcardNotTerminal => "wildcard must be the last segment",
        }
    }
}

/// A value required to build a path was not supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParam(pub String);

impl PathPattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternIssue`] found.
    pub fn parse(raw: &str) -> Result<Self, PatternIssue> {
        let Some(body) = raw.strip_prefix('/') else {
            return Err(PatternIssue::MissingLeadingSlash);
        };
        let body = match body.strip_suffix('/') {
            Some("") => return Err(PatternIssue::EmptySegment),
            Some(trimmed) => trimmed,
            None => body,
        };

        let mut segments = Vec::new();
        let mut names = HashSet::new();
        if !body.is_empty() {
            for part in body.split('/') {
                if matches!(segments.last(), Some(Segment::Wildcard(_))) {
                    return Err(PatternIssue::WildcardNotTerminal);
                }
                let segment = parse_segment(part)?;
                if let Segment::Param(name) | Segment::Wildcard(Some(name)) = &segment {
                    if !names.insert(name.clone()) {
                        return Err(PatternIssue::DuplicateParam);
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self { raw: raw.to_owned(), segments })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the pattern is a bare wildcard that matches every path.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Wildcard(_)])
    }

    /// Match an already-normalized path (no query or fragment).
    ///
    /// Returns the decoded parameters on success.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts = split_path(path);
        let mut params = BTreeMap::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard(name) => {
                    if let Some(name) = name {
                        let rest = parts.get(i..).unwrap_or_default().join("/");
                        params.insert(name.clone(), decode(&rest));
                    }
                    return Some(params);
                }
                Segment::Literal { folded, .. } => {
                    let part = parts.get(i)?;
                    if decode(part).to_lowercase() != *folded {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let part = parts.get(i)?;
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), decode(part));
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// Build a concrete path from parameter values.
    ///
    /// # Errors
    ///
    /// Returns [`MissingParam`] when a named parameter has no value. An
    /// unnamed wildcard contributes nothing to the built path.
    pub fn build(&self, params: &BTreeMap<String, String>) -> Result<String, MissingParam> {
        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal { text, .. } => parts.push(text.clone()),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| MissingParam(name.clone()))?;
                    parts.push(utf8_percent_encode(value, SEGMENT).to_string());
                }
                Segment::Wildcard(Some(name)) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| MissingParam(name.clone()))?;
                    if !value.is_empty() {
                        let encoded: Vec<String> = value
                            .split('/')
                            .map(|p| utf8_percent_encode(p, SEGMENT).to_string())
                            .collect();
                        parts.push(encoded.join("/"));
                    }
                }
                Segment::Wildcard(None) => {}
            }
        }
        Ok(format!("/{}", parts.join("/")))
    }
}

fn parse_segment(part: &str) -> Result<Segment, PatternIssue> {
    if part.is_empty() {
        return Err(PatternIssue::EmptySegment);
    }
    if let Some(name) = part.strip_prefix(':') {
        return match name.split_once('(') {
            Some((name, ".*)*" | ".*)")) => Ok(Segment::Wildcard(Some(param_name(name)?))),
            Some(_) => Err(PatternIssue::UnsupportedRegex),
            None => Ok(Segment::Param(param_name(name)?)),
        };
    }
    if let Some(name) = part.strip_prefix('*') {
        if name.is_empty() {
            return Ok(Segment::Wildcard(None));
        }
        return Ok(Segment::Wildcard(Some(param_name(name)?)));
    }
    Ok(Segment::Literal { text: part.to_owned(), folded: decode(part).to_lowercase() })
}

fn param_name(name: &str) -> Result<String, PatternIssue> {
    if name.is_empty() {
        return Err(PatternIssue::EmptyParamName);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PatternIssue::InvalidParamName);
    }
    Ok(name.to_owned())
}

/// Split a path into raw segments, tolerating one trailing slash.
fn split_path(path: &str) -> Vec<&str> {
    let body = path.strip_prefix('/').unwrap_or(path);
    let body = body.strip_suffix('/').unwrap_or(body);
    if body.is_empty() { Vec::new() } else { body.split('/').collect() }
}

/// Percent-decode a segment; escapes that are not valid UTF-8 keep the raw text.
fn decode(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_owned(), Cow::into_owned)
}
