//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in declared order
//! - Look up the first route matching a path
//! - Follow redirect entries to their destination
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan (tables are a handful of entries)
//! - A catch-all entry must be the last one; anything after it is unreachable
//! - Explicit NoMatch rather than silent default

use crate::routing::matcher::{strip_query, Params, RoutePattern};
use crate::routing::RouteError;

/// Redirect chains longer than this are treated as a loop.
pub const MAX_REDIRECTS: usize = 8;

/// What a route entry resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget<V> {
    /// Render this view.
    View(V),
    /// Navigate to another path and resolve again.
    Redirect(String),
}

/// Declared route: pattern plus target.
#[derive(Debug, Clone)]
pub struct RouteEntry<V> {
    pub pattern: RoutePattern,
    pub target: RouteTarget<V>,
}

impl<V> RouteEntry<V> {
    pub fn view(pattern: &str, view: V) -> Result<Self, RouteError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            target: RouteTarget::View(view),
        })
    }

    pub fn redirect(pattern: &str, to: impl Into<String>) -> Result<Self, RouteError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            target: RouteTarget::Redirect(to.into()),
        })
    }
}

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<V> {
    /// Path that produced the match, after redirects.
    pub path: String,
    /// Pattern of the matching entry.
    pub pattern: String,
    /// Parameters bound by the pattern.
    pub params: Params,
    /// View to render.
    pub view: V,
    /// Number of redirects followed.
    pub redirects: usize,
}

/// Ordered, first-match route table.
#[derive(Debug, Clone)]
pub struct Router<V> {
    entries: Vec<RouteEntry<V>>,
}

impl<V: Clone> Router<V> {
    /// Build a router from entries in priority order.
    pub fn new(entries: Vec<RouteEntry<V>>) -> Result<Self, RouteError> {
        if let Some(pos) = entries.iter().position(|e| e.pattern.segments().len() <= 1 && e.pattern.is_wildcard()) {
            if pos + 1 != entries.len() {
                return Err(RouteError::UnreachableRoutes {
                    wildcard: entries[pos].pattern.to_string(),
                    shadowed: entries.len() - pos - 1,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RouteEntry<V>] {
        &self.entries
    }

    /// Find the first entry matching `path`, without following redirects.
    pub fn match_path(&self, path: &str) -> Option<(&RouteEntry<V>, Params)> {
        self.entries
            .iter()
            .find_map(|entry| entry.pattern.matches(path).map(|params| (entry, params)))
    }

    /// Resolve `path` to a view, following redirects.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<V>, RouteError> {
        let mut current = strip_query(path).to_string();
        if current.is_empty() {
            current.push('/');
        }

        for redirects in 0..=MAX_REDIRECTS {
            let (entry, params) = self
                .match_path(&current)
                .ok_or_else(|| RouteError::NoMatch(current.clone()))?;

            match &entry.target {
                RouteTarget::View(view) => {
                    tracing::trace!(path = %current, pattern = %entry.pattern, "Route matched");
                    return Ok(RouteMatch {
                        path: current,
                        pattern: entry.pattern.to_string(),
                        params,
                        view: view.clone(),
                        redirects,
                    });
                }
                RouteTarget::Redirect(to) => {
                    tracing::trace!(from = %current, to = %to, "Following redirect");
                    current = to.clone();
                }
            }
        }

        Err(RouteError::RedirectLoop(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        A,
        B,
        Fallback,
    }

    fn table() -> Router<View> {
        Router::new(vec![
            RouteEntry::redirect("/", "/a").unwrap(),
            RouteEntry::view("/a", View::A).unwrap(),
            RouteEntry::view("/items/:id", View::B).unwrap(),
            RouteEntry::view("/items/special", View::A).unwrap(),
            RouteEntry::view("*", View::Fallback).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn first_declared_match_wins() {
        // `/items/:id` is declared before `/items/special`
        let m = table().resolve("/items/special").unwrap();
        assert_eq!(m.view, View::B);
        assert_eq!(m.params.get("id").unwrap(), "special");
    }

    #[test]
    fn redirects_are_followed() {
        let m = table().resolve("/").unwrap();
        assert_eq!(m.view, View::A);
        assert_eq!(m.path, "/a");
        assert_eq!(m.redirects, 1);
    }

    #[test]
    fn wildcard_catches_the_rest() {
        let m = table().resolve("/nope/nothing?x=1").unwrap();
        assert_eq!(m.view, View::Fallback);
        assert_eq!(m.pattern, "*");
    }

    #[test]
    fn no_wildcard_means_no_match() {
        let router = Router::new(vec![RouteEntry::view("/a", View::A).unwrap()]).unwrap();
        assert_eq!(router.resolve("/b"), Err(RouteError::NoMatch("/b".into())));
    }

    #[test]
    fn wildcard_must_be_last() {
        let err = Router::new(vec![
            RouteEntry::view("*", View::Fallback).unwrap(),
            RouteEntry::view("/a", View::A).unwrap(),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::UnreachableRoutes { shadowed: 1, .. }));
    }

    #[test]
    fn redirect_loops_are_reported() {
        let router = Router::<View>::new(vec![
            RouteEntry::redirect("/x", "/y").unwrap(),
            RouteEntry::redirect("/y", "/x").unwrap(),
        ])
        .unwrap();
        assert_eq!(router.resolve("/x"), Err(RouteError::RedirectLoop("/x".into())));
    }
}
