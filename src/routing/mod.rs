//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (path, query)
//!     → router.rs (ordered lookup, redirects)
//!     → matcher.rs (segment-by-segment pattern match)
//!     → Return: matched view + params, or NoMatch
//!
//! Route Compilation (at startup):
//!     tables.rs (declared entries, in order)
//!     → parse patterns
//!     → reject unreachable entries after a catch-all
//!     → freeze as immutable Router
//!     → app.rs attaches it to a mount point
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod app;
pub mod matcher;
pub mod router;
pub mod tables;

pub use app::{admin_app, site_app, Application, Navigation};
pub use matcher::{Params, RoutePattern, Segment};
pub use router::{RouteEntry, RouteMatch, RouteTarget, Router};
pub use tables::{admin_routes, site_routes, AdminView, SiteView};

/// Routing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("catch-all '{wildcard}' shadows {shadowed} later route(s)")]
    UnreachableRoutes { wildcard: String, shadowed: usize },

    #[error("no route matches '{0}'")]
    NoMatch(String),

    #[error("too many redirects resolving '{0}'")]
    RedirectLoop(String),
}
