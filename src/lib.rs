//! Blog platform: shared API client, route tables and the SSR dev server.

pub mod api;
pub mod build;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod ssr;

pub use api::{ApiClient, BlogResource, UploadResource};
pub use config::schema::PlatformConfig;
pub use http::DevServer;
pub use lifecycle::Shutdown;
pub use ssr::{Orchestrator, RendererHandle};
