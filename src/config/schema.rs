//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server
//! and the API client. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the blog platform.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlatformConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Shared API client settings.
    pub api: ApiConfig,

    /// Reverse proxy for `/api` requests.
    pub proxy: ProxyConfig,

    /// Static asset serving under `/dist`.
    pub assets: AssetsConfig,

    /// Server-side rendering settings.
    pub ssr: SsrConfig,

    /// Build watcher settings.
    pub build: BuildConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:65432").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:65432".to_string(),
        }
    }
}

/// HTTP client configuration shared by every resource wrapper.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:65432/api".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Reverse proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path prefix that is forwarded upstream.
    pub prefix: String,

    /// Upstream origin (e.g., "http://127.0.0.1:3000").
    pub upstream: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            upstream: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// URL prefix for static assets.
    pub prefix: String,

    /// Directory holding the build output.
    pub dir: String,

    /// Send a long-lived cache directive.
    pub cache: bool,

    /// `max-age` in seconds when caching is enabled.
    pub max_age_secs: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            prefix: "/dist".to_string(),
            dir: "dist".to_string(),
            cache: true,
            max_age_secs: 60 * 60 * 24 * 30,
        }
    }
}

/// Server-side rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SsrConfig {
    /// Page template containing the app outlet.
    pub template_path: String,

    /// Fixed page title passed in every render context.
    pub title: String,

    /// Path of the hot-reload event stream.
    pub hot_reload_path: String,

    /// Heartbeat interval for the hot-reload stream in milliseconds.
    pub heartbeat_ms: u64,
}

impl Default for SsrConfig {
    fn default() -> Self {
        Self {
            template_path: "src/index.template.html".to_string(),
            title: "yeahz博客".to_string(),
            hot_reload_path: "/__hmr".to_string(),
            heartbeat_ms: 5_000,
        }
    }
}

/// Build watcher configuration for both bundle sides.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Browser-targeted bundle.
    pub client: WatchTarget,

    /// Server-targeted bundle.
    pub server: WatchTarget,

    /// Poll interval for the filesystem watcher in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            client: WatchTarget {
                artifact: "dist/vue-ssr-client-manifest.json".to_string(),
                command: None,
            },
            server: WatchTarget {
                artifact: "dist/vue-ssr-server-bundle.json".to_string(),
                command: None,
            },
            poll_interval_ms: 500,
        }
    }
}

/// One side of the build: the artifact it emits and, optionally, the bundler
/// command that keeps it up to date.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchTarget {
    /// Path of the JSON artifact produced by the bundler.
    pub artifact: String,

    /// Bundler invocation in watch mode (program followed by arguments).
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
