//! Route tables for the public site and the admin console.

use std::fmt;

use crate::routing::router::{RouteEntry, Router};
use crate::routing::RouteError;

/// Views of the public blog site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteView {
    Blogs,
    Detail,
    About,
    NotFound,
}

impl SiteView {
    pub fn name(&self) -> &'static str {
        match self {
            SiteView::Blogs => "Blogs",
            SiteView::Detail => "Detail",
            SiteView::About => "About",
            SiteView::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for SiteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Views of the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminView {
    Login,
    Blogs,
    Edit,
    NotFound,
}

impl AdminView {
    pub fn name(&self) -> &'static str {
        match self {
            AdminView::Login => "Login",
            AdminView::Blogs => "Blogs",
            AdminView::Edit => "Edit",
            AdminView::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for AdminView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Public site routes, in priority order.
pub fn site_routes() -> Result<Router<SiteView>, RouteError> {
    Router::new(vec![
        RouteEntry::redirect("/", "/home")?,
        RouteEntry::view("/home", SiteView::Blogs)?,
        RouteEntry::view("/blogs/:blogId", SiteView::Detail)?,
        RouteEntry::view("/about", SiteView::About)?,
        RouteEntry::view("/*", SiteView::NotFound)?,
    ])
}

/// Admin console routes, in priority order.
///
/// No route is guarded; access control, if any, lives in front of the app.
pub fn admin_routes() -> Result<Router<AdminView>, RouteError> {
    Router::new(vec![
        RouteEntry::view("/login", AdminView::Login)?,
        RouteEntry::redirect("/", "/login")?,
        RouteEntry::view("/blogs", AdminView::Blogs)?,
        RouteEntry::view("/edit", AdminView::Edit)?,
        RouteEntry::view("/edit/:blogId", AdminView::Edit)?,
        RouteEntry::view("*", AdminView::NotFound)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_table() {
        let router = site_routes().unwrap();

        let home = router.resolve("/").unwrap();
        assert_eq!(home.view, SiteView::Blogs);
        assert_eq!(home.path, "/home");

        let detail = router.resolve("/blogs/5f1c").unwrap();
        assert_eq!(detail.view, SiteView::Detail);
        assert_eq!(detail.params.get("blogId").unwrap(), "5f1c");

        assert_eq!(router.resolve("/about").unwrap().view, SiteView::About);
        assert_eq!(router.resolve("/About").unwrap().view, SiteView::About);
        assert_eq!(router.resolve("/BLOGS/7").unwrap().view, SiteView::Detail);

        let spaced = router.resolve("/blogs/a%20b").unwrap();
        assert_eq!(spaced.params.get("blogId").unwrap(), "a b");
        assert_eq!(router.resolve("/blogs").unwrap().view, SiteView::NotFound);
        assert_eq!(router.resolve("/x/y/z").unwrap().view, SiteView::NotFound);
    }

    #[test]
    fn admin_table() {
        let router = admin_routes().unwrap();

        let root = router.resolve("/").unwrap();
        assert_eq!(root.view, AdminView::Login);
        assert_eq!(root.path, "/login");

        assert_eq!(router.resolve("/blogs").unwrap().view, AdminView::Blogs);

        let new_post = router.resolve("/edit").unwrap();
        assert_eq!(new_post.view, AdminView::Edit);
        assert!(new_post.params.is_empty());

        let existing = router.resolve("/edit/17").unwrap();
        assert_eq!(existing.view, AdminView::Edit);
        assert_eq!(existing.params.get("blogId").unwrap(), "17");

        assert_eq!(router.resolve("/settings").unwrap().view, AdminView::NotFound);
    }
}
