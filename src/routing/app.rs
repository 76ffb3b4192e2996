//! Application bootstrap: a router attached to a root mount point.

use std::sync::Arc;

use crate::routing::router::{RouteMatch, Router};
use crate::routing::tables::{admin_routes, site_routes, AdminView, SiteView};
use crate::routing::RouteError;

/// DOM anchor both applications mount on.
pub const MOUNT_POINT: &str = "#app";

/// A routed application.
#[derive(Debug, Clone)]
pub struct Application<V> {
    name: &'static str,
    mount: &'static str,
    router: Arc<Router<V>>,
}

/// Outcome of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation<V> {
    pub app: &'static str,
    pub mount: &'static str,
    pub route: RouteMatch<V>,
}

impl<V: Clone> Application<V> {
    pub fn new(name: &'static str, router: Router<V>) -> Self {
        Self {
            name,
            mount: MOUNT_POINT,
            router: Arc::new(router),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mount_point(&self) -> &'static str {
        self.mount
    }

    pub fn router(&self) -> &Router<V> {
        &self.router
    }

    /// Resolve `path` and report which view gets rendered at the mount point.
    pub fn navigate(&self, path: &str) -> Result<Navigation<V>, RouteError> {
        let route = self.router.resolve(path)?;
        tracing::debug!(app = self.name, path = %path, pattern = %route.pattern, "Navigated");
        Ok(Navigation {
            app: self.name,
            mount: self.mount,
            route,
        })
    }
}

/// Bootstrap the public blog site.
pub fn site_app() -> Result<Application<SiteView>, RouteError> {
    Ok(Application::new("site", site_routes()?))
}

/// Bootstrap the admin console.
pub fn admin_app() -> Result<Application<AdminView>, RouteError> {
    Ok(Application::new("admin", admin_routes()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apps_mount_on_anchor() {
        let site = site_app().unwrap();
        let nav = site.navigate("/blogs/1").unwrap();
        assert_eq!(nav.app, "site");
        assert_eq!(nav.mount, "#app");
        assert_eq!(nav.route.view, SiteView::Detail);

        let admin = admin_app().unwrap();
        assert_eq!(admin.mount_point(), MOUNT_POINT);
        assert_eq!(admin.navigate("/").unwrap().route.view, AdminView::Login);
    }
}
