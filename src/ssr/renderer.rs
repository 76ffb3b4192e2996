//! Renderers and the engine that builds them.
//!
//! # Responsibilities
//! - Define the render contract (`Renderer`) and how one is built (`RenderEngine`)
//! - Provide the built-in template engine used by the dev server
//!
//! # Design Decisions
//! - A renderer is immutable; new artifacts mean a new renderer
//! - Construction validates the artifacts so bad builds never reach requests
//! - Interpolated values are HTML-escaped

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SsrConfig;
use crate::routing::{site_routes, Params, RouteError, Router, SiteView};
use crate::ssr::artifacts::{ClientManifest, ServerBundle};

/// Marker the page template must contain; the app markup replaces it.
pub const OUTLET: &str = "<!--vue-ssr-outlet-->";

/// Per-request render input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub title: String,
    pub url: String,
}

/// Render and construction failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("bundle entry '{0}' not found in bundle files")]
    MissingEntry(String),

    #[error("template has no <!--vue-ssr-outlet--> marker")]
    MissingOutlet,

    #[error("template error: {0}")]
    Template(String),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("cannot read template {path}: {source}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns a request context into HTML.
pub trait Renderer: Send + Sync {
    fn render_to_string(&self, context: &RenderContext) -> Result<String, RenderError>;
}

/// Builds renderers from a bundle/manifest pair.
pub trait RenderEngine: Send + Sync {
    fn create_renderer(
        &self,
        bundle: &ServerBundle,
        manifest: &ClientManifest,
    ) -> Result<Arc<dyn Renderer>, RenderError>;
}

/// Built-in engine: page template plus per-view markup from the bundle.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    template: String,
}

impl TemplateEngine {
    /// Placeholders in the template are checked here, not per request.
    pub fn new(template: impl Into<String>) -> Result<Self, RenderError> {
        let template = template.into();
        if !template.contains(OUTLET) {
            return Err(RenderError::MissingOutlet);
        }
        let sample = RenderContext {
            title: String::new(),
            url: String::from("/"),
        };
        interpolate(&template, &sample, &Params::new())?;
        Ok(Self { template })
    }

    /// Read the page template named in the config.
    pub fn from_config(config: &SsrConfig) -> Result<Self, RenderError> {
        let path = Path::new(&config.template_path);
        let template = std::fs::read_to_string(path).map_err(|source| RenderError::TemplateIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(template)
    }
}

impl RenderEngine for TemplateEngine {
    fn create_renderer(
        &self,
        bundle: &ServerBundle,
        manifest: &ClientManifest,
    ) -> Result<Arc<dyn Renderer>, RenderError> {
        let entry = bundle
            .entry_source()
            .ok_or_else(|| RenderError::MissingEntry(bundle.entry.clone()))?
            .to_string();

        let views = bundle
            .files
            .iter()
            .filter_map(|(name, source)| {
                name.strip_suffix(".html")
                    .map(|view| (view.to_string(), source.clone()))
            })
            .collect();

        let head: String = manifest
            .initial_styles()
            .map(|href| format!("<link rel=\"stylesheet\" href=\"{}\">", escape_html(&href)))
            .collect();
        let scripts: String = manifest
            .initial_scripts()
            .map(|src| format!("<script src=\"{}\" defer></script>", escape_html(&src)))
            .collect();

        tracing::debug!(
            entry = %bundle.entry,
            files = bundle.files.len(),
            "Renderer created"
        );

        Ok(Arc::new(BundleRenderer {
            template: self.template.clone(),
            entry,
            views,
            head,
            scripts,
            site: site_routes()?,
        }))
    }
}

/// Renderer built by `TemplateEngine`.
#[derive(Debug)]
pub struct BundleRenderer {
    template: String,
    entry: String,
    views: BTreeMap<String, String>,
    head: String,
    scripts: String,
    site: Router<SiteView>,
}

impl Renderer for BundleRenderer {
    fn render_to_string(&self, context: &RenderContext) -> Result<String, RenderError> {
        let (markup, params) = match self.site.resolve(&context.url) {
            Ok(route) => (
                self.views.get(route.view.name()).unwrap_or(&self.entry),
                route.params,
            ),
            Err(RouteError::RedirectLoop(_)) => (&self.entry, Params::new()),
            Err(e) => return Err(e.into()),
        };
        let app = interpolate(markup, context, &params)?;

        let page = interpolate(&self.template, context, &Params::new())?;
        let page = page.replacen(OUTLET, &app, 1);
        let page = insert_before(page, "</head>", &self.head);
        Ok(insert_before(page, "</body>", &self.scripts))
    }
}

fn insert_before(mut page: String, marker: &str, content: &str) -> String {
    if content.is_empty() {
        return page;
    }
    match page.rfind(marker) {
        Some(pos) => page.insert_str(pos, content),
        None => page.push_str(content),
    }
    page
}

/// Replace `{{ key }}` placeholders (HTML-escaped) and `{{{ key }}}` ones (raw).
fn interpolate(source: &str, context: &RenderContext, params: &Params) -> Result<String, RenderError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let (after, close, raw) = match after.strip_prefix('{') {
            Some(inner) => (inner, "}}}", true),
            None => (after, "}}", false),
        };
        let end = after
            .find(close)
            .ok_or_else(|| RenderError::Template("unterminated placeholder".into()))?;
        let key = after[..end].trim();

        let value = match key {
            "url" => context.url.as_str(),
            "title" => context.title.as_str(),
            _ => match key.strip_prefix("params.") {
                Some(name) => params.get(name).map(String::as_str).unwrap_or(""),
                None => return Err(RenderError::Template(format!("unknown placeholder '{}'", key))),
            },
        };
        if raw {
            out.push_str(value);
        } else {
            out.push_str(&escape_html(value));
        }
        rest = &after[end + close.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
