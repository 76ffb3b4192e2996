//! HTTP dev server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID)
//! - Serve build output under the asset prefix with a cache directive
//! - Forward API requests to the upstream unchanged
//! - Render every other page with the current renderer
//! - Stream renderer changes to hot-reload clients

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{self, header, uri::{Authority, PathAndQuery, Scheme}, HeaderMap, Method, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{
    services::{fs::ServeFileSystemResponseBody, ServeDir},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::PlatformConfig;
use crate::http::hot_reload::hot_reload_handler;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{asset_cache_control, bad_gateway, internal_error};
use crate::observability::metrics;
use crate::ssr::{RenderContext, RendererHandle};

/// Errors that stop the dev server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid upstream '{0}'")]
    InvalidUpstream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scheme and authority requests under the proxy prefix are sent to.
#[derive(Debug, Clone)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
}

impl Upstream {
    pub fn parse(upstream: &str) -> Result<Self, ServerError> {
        let uri: Uri = upstream
            .parse()
            .map_err(|_| ServerError::InvalidUpstream(upstream.to_string()))?;
        let (Some(scheme), Some(authority)) = (uri.scheme().cloned(), uri.authority().cloned()) else {
            return Err(ServerError::InvalidUpstream(upstream.to_string()));
        };
        Ok(Self { scheme, authority })
    }

    /// Same path and query, upstream origin.
    fn rewrite(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub renderer: RendererHandle,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Upstream,
    pub title: Arc<str>,
    pub heartbeat_ms: u64,
}

/// HTTP dev server.
pub struct DevServer {
    router: Router,
    config: PlatformConfig,
}

impl DevServer {
    /// Create a dev server rendering with `renderer`.
    pub fn new(config: PlatformConfig, renderer: RendererHandle) -> Result<Self, ServerError> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            renderer,
            client,
            upstream: Upstream::parse(&config.proxy.upstream)?,
            title: Arc::from(config.ssr.title.as_str()),
            heartbeat_ms: config.ssr.heartbeat_ms,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &PlatformConfig, state: AppState) -> Router {
        // Misses must not be cached for the asset lifetime
        let cache_control = asset_cache_control(&config.assets);
        let assets = SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            move |response: &http::Response<ServeFileSystemResponseBody>| {
                response.status().is_success().then(|| cache_control.clone())
            },
        )
        .layer(ServeDir::new(&config.assets.dir));

        Router::new()
            .route(&config.ssr.hot_reload_path, get(hot_reload_handler))
            .route(&config.proxy.prefix, any(proxy_handler))
            .route(&format!("{}/{{*path}}", config.proxy.prefix), any(proxy_handler))
            .nest_service(&config.assets.prefix, assets)
            .fallback(render_handler)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.proxy.upstream,
            assets = %self.config.assets.dir,
            "Dev server started on {}",
            addr.port()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Forward a request to the upstream with method, path, headers and body intact.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(request.headers()).to_string();
    let (mut parts, body) = request.into_parts();

    parts.uri = match state.upstream.rewrite(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            metrics::record_proxy(StatusCode::BAD_GATEWAY.as_u16());
            return bad_gateway();
        }
    };

    tracing::debug!(request_id = %request_id, method = %parts.method, uri = %parts.uri, "Proxying request");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_proxy(response.status().as_u16());
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_proxy(StatusCode::BAD_GATEWAY.as_u16());
            bad_gateway()
        }
    }
}

/// Render the requested page, waiting for the first renderer if needed.
async fn render_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::NOT_FOUND.into_response();
    }

    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let active = state.renderer.ready().await;
    let context = RenderContext {
        title: state.title.to_string(),
        url,
    };

    let start = Instant::now();
    match active.renderer.render_to_string(&context) {
        Ok(html) => {
            metrics::record_render(true, start);
            Html(html).into_response()
        }
        Err(e) => {
            metrics::record_render(false, start);
            tracing::error!(
                request_id = %request_id(&headers),
                url = %context.url,
                generation = active.generation,
                error = %e,
                "Render failed"
            );
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_rewrite_keeps_path_and_query() {
        let upstream = Upstream::parse("http://127.0.0.1:3000").unwrap();
        let uri: Uri = "/api/blogs?page=2".parse().unwrap();
        assert_eq!(
            upstream.rewrite(&uri).unwrap().to_string(),
            "http://127.0.0.1:3000/api/blogs?page=2"
        );
    }

    #[test]
    fn upstream_needs_origin() {
        assert!(Upstream::parse("/relative").is_err());
    }
}
