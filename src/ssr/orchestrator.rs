//! Dev-server orchestrator.
//!
//! Owns the latest client manifest, the latest server bundle and the renderer
//! built from them. Build events are the only input; the renderer handle is
//! the only output.
//!
//! # Lifecycle
//! ```text
//! AwaitingClientBuild ─┬─ manifest ─▶ AwaitingServerBuild ─ bundle ─┐
//!                      └─ bundle (manifest still missing) ─┐        │
//!                                                          ▼        ▼
//!                                   Ready ◀─ renderer built ─ Rebuilding
//!                                     └──── any later successful build ─┘
//! ```
//! Failed builds never change state or artifacts. A renderer that cannot be
//! built from a new artifact is treated the same way: the artifact is dropped
//! and the previous renderer stays in service.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{broadcast, mpsc, watch};

use crate::build::{Artifact, BuildEvent};
use crate::observability::metrics;
use crate::ssr::artifacts::{ClientManifest, ServerBundle};
use crate::ssr::renderer::{RenderEngine, Renderer};

/// Where the orchestrator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    AwaitingClientBuild,
    AwaitingServerBuild,
    Ready,
    Rebuilding,
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrchestratorState::AwaitingClientBuild => "awaiting-client-build",
            OrchestratorState::AwaitingServerBuild => "awaiting-server-build",
            OrchestratorState::Ready => "ready",
            OrchestratorState::Rebuilding => "rebuilding",
        };
        f.write_str(s)
    }
}

/// A renderer together with the generation it was published as.
pub struct ActiveRenderer {
    pub generation: u64,
    pub renderer: Arc<dyn Renderer>,
}

impl fmt::Debug for ActiveRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRenderer")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

struct HandleInner {
    current: ArcSwapOption<ActiveRenderer>,
    generation: watch::Sender<u64>,
    state: watch::Sender<OrchestratorState>,
}

/// Read side of the orchestrator, shared with request handlers.
#[derive(Clone)]
pub struct RendererHandle {
    inner: Arc<HandleInner>,
}

impl RendererHandle {
    fn new() -> Self {
        let (generation, _) = watch::channel(0);
        let (state, _) = watch::channel(OrchestratorState::AwaitingClientBuild);
        Self {
            inner: Arc::new(HandleInner {
                current: ArcSwapOption::empty(),
                generation,
                state,
            }),
        }
    }

    /// Renderer in service right now, if any.
    pub fn current(&self) -> Option<Arc<ActiveRenderer>> {
        self.inner.current.load_full()
    }

    /// Wait until a renderer exists, then return the current one.
    pub async fn ready(&self) -> Arc<ActiveRenderer> {
        let mut changes = self.inner.generation.subscribe();
        loop {
            if let Some(active) = self.current() {
                return active;
            }
            if changes.changed().await.is_err() {
                // The sender lives as long as `self`
                std::future::pending::<()>().await;
            }
        }
    }

    /// Notifications carrying the generation of every newly published renderer.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.generation.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.inner.generation.borrow()
    }

    pub fn state(&self) -> OrchestratorState {
        *self.inner.state.borrow()
    }

    fn publish(&self, renderer: Arc<dyn Renderer>) -> u64 {
        let generation = self.generation() + 1;
        self.inner.current.store(Some(Arc::new(ActiveRenderer {
            generation,
            renderer,
        })));
        self.inner.generation.send_replace(generation);
        generation
    }

    fn set_state(&self, state: OrchestratorState) {
        let previous = self.inner.state.send_replace(state);
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "Orchestrator state changed");
        }
    }
}

impl fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererHandle")
            .field("generation", &self.generation())
            .field("state", &self.state())
            .finish()
    }
}

/// Owns the artifact pair and rebuilds the renderer on every good build.
pub struct Orchestrator {
    engine: Arc<dyn RenderEngine>,
    manifest: Option<ClientManifest>,
    bundle: Option<ServerBundle>,
    handle: RendererHandle,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            manifest: None,
            bundle: None,
            handle: RendererHandle::new(),
        }
    }

    pub fn handle(&self) -> RendererHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> OrchestratorState {
        self.handle.state()
    }

    pub fn manifest(&self) -> Option<&ClientManifest> {
        self.manifest.as_ref()
    }

    pub fn bundle(&self) -> Option<&ServerBundle> {
        self.bundle.as_ref()
    }

    /// Consume build events until the stream ends or shutdown is signalled.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<BuildEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!("Orchestrator waiting for builds");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => {
                        tracing::info!("Build event stream closed");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Orchestrator received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Apply one build event.
    pub fn apply(&mut self, event: BuildEvent) {
        match event {
            BuildEvent::Failed { side, errors, warnings } => {
                for err in &errors {
                    tracing::error!(side = %side, "{}", err);
                }
                for warning in &warnings {
                    tracing::warn!(side = %side, "{}", warning);
                }
                metrics::record_build(side, false);
                tracing::warn!(
                    side = %side,
                    errors = errors.len(),
                    state = %self.state(),
                    "Build failed, keeping previous artifacts"
                );
            }
            BuildEvent::Succeeded { artifact, warnings } => {
                let side = artifact.side();
                for warning in &warnings {
                    tracing::warn!(side = %side, "{}", warning);
                }
                metrics::record_build(side, true);
                self.accept(artifact);
            }
        }
    }

    fn accept(&mut self, artifact: Artifact) {
        let side = artifact.side();
        let (manifest, bundle) = match artifact {
            Artifact::ClientManifest(m) => (Some(m), self.bundle.clone()),
            Artifact::ServerBundle(b) => (self.manifest.clone(), Some(b)),
        };

        let (Some(m), Some(b)) = (&manifest, &bundle) else {
            self.manifest = manifest;
            self.bundle = bundle;
            self.handle.set_state(self.waiting_state());
            tracing::info!(side = %side, state = %self.state(), "Build accepted");
            return;
        };

        if self.handle.current().is_some()
            && self.manifest.as_ref() == Some(m)
            && self.bundle.as_ref() == Some(b)
        {
            tracing::debug!(side = %side, "Build output unchanged, keeping renderer");
            return;
        }

        let was_ready = self.handle.current().is_some();
        if was_ready {
            self.handle.set_state(OrchestratorState::Rebuilding);
        }

        match self.engine.create_renderer(b, m) {
            Ok(renderer) => {
                self.manifest = manifest;
                self.bundle = bundle;
                let generation = self.handle.publish(renderer);
                self.handle.set_state(OrchestratorState::Ready);
                metrics::record_renderer_rebuild();
                tracing::info!(side = %side, generation, "Renderer ready");
            }
            Err(e) => {
                tracing::error!(side = %side, error = %e, "Cannot build renderer, discarding build");
                self.handle.set_state(if was_ready {
                    OrchestratorState::Ready
                } else {
                    self.waiting_state()
                });
            }
        }
    }

    fn waiting_state(&self) -> OrchestratorState {
        match (&self.manifest, &self.bundle) {
            (None, _) => OrchestratorState::AwaitingClientBuild,
            (Some(_), _) => OrchestratorState::AwaitingServerBuild,
        }
    }
}
