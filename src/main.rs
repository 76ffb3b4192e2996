//! Blog SSR dev server.
//!
//! # Architecture Overview
//!
//! ```text
//!   client bundler ──▶ manifest JSON ──▶ watcher ──┐
//!                                                  ├──▶ orchestrator ──▶ renderer (swapped atomically)
//!   server bundler ──▶ bundle JSON   ──▶ watcher ──┘                          │
//!                                                                            ▼
//!   Browser ──▶ /dist/*  static files (cached)                       ┌──────────────┐
//!           ──▶ /api/*   reverse proxy ──▶ REST API                  │ render page  │
//!           ──▶ /__hmr   renderer change events                      │ (waits for   │
//!           ──▶ *        ───────────────────────────────────────────▶│  first build)│
//!                                                                    └──────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use blog_platform::config::load_or_default;
use blog_platform::http::DevServer;
use blog_platform::lifecycle::{start_build_pipeline, Shutdown};
use blog_platform::observability::{logging, metrics};
use blog_platform::ssr::TemplateEngine;

#[derive(Parser)]
#[command(name = "blog-dev-server")]
#[command(about = "Server-rendering dev server for the blog site", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long, env = "BLOG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!("blog-dev-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.proxy.upstream,
        client_artifact = %config.build.client.artifact,
        server_artifact = %config.build.server.artifact,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let engine = Arc::new(TemplateEngine::from_config(&config.ssr)?);
    let mut pipeline = start_build_pipeline(&config, engine, &shutdown)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = DevServer::new(config, pipeline.handle())?;

    tokio::select! {
        result = server.run(listener, shutdown.subscribe()) => result?,
        result = pipeline.wait_for_failure() => {
            shutdown.trigger();
            result?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
