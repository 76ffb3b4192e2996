//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the build watchers and, when configured, the bundlers
//! - Start the orchestrator task consuming their events
//! - Surface a bundler that dies as a fatal error
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Watchers start before the listener so early requests queue on readiness

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::build::{ArtifactWatcher, BuildError, BuildSide, BundlerProcess};
use crate::config::{PlatformConfig, WatchTarget};
use crate::lifecycle::Shutdown;
use crate::ssr::{Orchestrator, RenderEngine, RendererHandle};

/// Running build pipeline: watchers, bundlers and the orchestrator task.
pub struct BuildPipeline {
    handle: RendererHandle,
    _watchers: Vec<RecommendedWatcher>,
    bundlers: JoinSet<Result<(), BuildError>>,
}

impl BuildPipeline {
    pub fn handle(&self) -> RendererHandle {
        self.handle.clone()
    }

    /// Resolve with the first bundler failure; never resolves without bundlers.
    pub async fn wait_for_failure(&mut self) -> Result<(), BuildError> {
        while let Some(joined) = self.bundlers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(e),
                Err(e) => tracing::error!(error = %e, "Bundler task panicked"),
            }
        }
        std::future::pending().await
    }
}

/// Start watchers, bundlers and the orchestrator.
pub fn start_build_pipeline(
    config: &PlatformConfig,
    engine: Arc<dyn RenderEngine>,
    shutdown: &Shutdown,
) -> Result<BuildPipeline, BuildError> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let poll_interval = Duration::from_millis(config.build.poll_interval_ms);

    let orchestrator = Orchestrator::new(engine);
    let handle = orchestrator.handle();
    tokio::spawn(orchestrator.run(events_rx, shutdown.subscribe()));

    let mut watchers = Vec::with_capacity(2);
    let mut bundlers = JoinSet::new();
    for (side, target) in [
        (BuildSide::Client, &config.build.client),
        (BuildSide::Server, &config.build.server),
    ] {
        watchers.push(
            ArtifactWatcher::new(side, Path::new(&target.artifact), poll_interval, events_tx.clone())
                .run()?,
        );
        if let Some(process) = bundler_for(side, target) {
            bundlers.spawn(process.run(shutdown.subscribe()));
        }
    }

    Ok(BuildPipeline {
        handle,
        _watchers: watchers,
        bundlers,
    })
}

fn bundler_for(side: BuildSide, target: &WatchTarget) -> Option<BundlerProcess> {
    target
        .command
        .as_deref()
        .and_then(|command| BundlerProcess::new(side, command))
}
