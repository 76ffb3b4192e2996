//! Route pattern matching logic.
//!
//! # Responsibilities
//! - Parse path patterns (`/blogs/:blogId`, `/*`, `*`)
//! - Match a request path segment by segment
//! - Bind named segments to their values
//!
//! # Design Decisions
//! - Static segments match ASCII case-insensitively
//! - Parameter values are percent-decoded, kept raw when not valid UTF-8
//! - A named parameter binds exactly one non-empty segment
//! - A wildcard is only allowed as the final segment and matches any remainder
//! - No regex to guarantee O(n) matching

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::routing::RouteError;

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text that must match exactly.
    Static(String),
    /// Named parameter (`:name`).
    Param(String),
    /// Catch-all for the remainder of the path (`*`).
    Wildcard,
}

/// Parameters bound while matching a path.
pub type Params = BTreeMap<String, String>;

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".into(),
            });
        }

        let raw: Vec<&str> = split_segments(trimmed).collect();
        let mut segments = Vec::with_capacity(raw.len());
        for (i, seg) in raw.iter().enumerate() {
            let segment = if *seg == "*" {
                if i + 1 != raw.len() {
                    return Err(RouteError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: "wildcard must be the last segment".into(),
                    });
                }
                Segment::Wildcard
            } else if let Some(name) = seg.strip_prefix(':') {
                if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(RouteError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: format!("invalid parameter name '{}'", name),
                    });
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Static(seg.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            source: trimmed.to_string(),
            segments,
        })
    }

    /// Whether this pattern ends in a catch-all.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a path, returning the bound parameters on success.
    ///
    /// The query string and fragment are ignored.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let path = strip_query(path);
        let parts: Vec<&str> = split_segments(path).collect();
        let mut params = Params::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Static(text) => {
                    if !parts.get(i)?.eq_ignore_ascii_case(text) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(i)?;
                    params.insert(name.clone(), decode_segment(value));
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split a path into its non-empty segments.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Drop the query string and fragment from a path.
pub fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
