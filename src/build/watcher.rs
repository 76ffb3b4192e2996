//! Build artifact watcher.
//!
//! Watches the directory holding one bundler output file and turns every
//! rewrite of that file into a `BuildEvent`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::build::{Artifact, BuildError, BuildEvent, BuildSide};
use crate::ssr::artifacts::{ClientManifest, ServerBundle};

/// A watcher that monitors one build artifact for changes.
pub struct ArtifactWatcher {
    side: BuildSide,
    path: PathBuf,
    poll_interval: Duration,
    events_tx: mpsc::UnboundedSender<BuildEvent>,
}

impl ArtifactWatcher {
    /// Create a watcher that reports into `events_tx`.
    pub fn new(
        side: BuildSide,
        path: &Path,
        poll_interval: Duration,
        events_tx: mpsc::UnboundedSender<BuildEvent>,
    ) -> Self {
        Self {
            side,
            path: path.to_path_buf(),
            poll_interval,
            events_tx,
        }
    }

    /// Start watching in a background thread.
    ///
    /// If the artifact already exists it is reported immediately. The returned
    /// watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, BuildError> {
        let side = self.side;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir).map_err(|e| BuildError::Watch {
            side,
            source: notify::Error::io(e),
        })?;

        if self.path.exists() {
            let _ = self.events_tx.send(load_artifact(side, &self.path));
        }

        let tx = self.events_tx.clone();
        let path = self.path.clone();
        let file_name = self.path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_artifact = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_artifact {
                        tracing::debug!(side = %side, path = ?path, "Build artifact changed");
                        let _ = tx.send(load_artifact(side, &path));
                    }
                }
                Err(e) => tracing::error!(side = %side, "Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )
        .map_err(|source| BuildError::Watch { side, source })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|source| BuildError::Watch { side, source })?;

        tracing::info!(side = %side, path = ?self.path, "Build watcher started");
        Ok(watcher)
    }
}

/// Read and parse one artifact file into a build event.
pub fn load_artifact(side: BuildSide, path: &Path) -> BuildEvent {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return BuildEvent::failed(side, vec![format!("cannot read {}: {}", path.display(), e)])
        }
    };
    parse_artifact(side, &content)
        .unwrap_or_else(|e| BuildEvent::failed(side, vec![format!("invalid {}: {}", path.display(), e)]))
}

/// Parse artifact JSON for the given side.
pub fn parse_artifact(side: BuildSide, content: &str) -> Result<BuildEvent, serde_json::Error> {
    let artifact = match side {
        BuildSide::Client => Artifact::ClientManifest(serde_json::from_str::<ClientManifest>(content)?),
        BuildSide::Server => Artifact::ServerBundle(serde_json::from_str::<ServerBundle>(content)?),
    };
    Ok(BuildEvent::succeeded(artifact))
}
