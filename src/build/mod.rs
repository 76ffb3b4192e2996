//! Build pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! bundler (client side)  ──▶ process.rs (optional, spawned in watch mode)
//!        │ writes manifest JSON
//!        ▼
//! watcher.rs (notify) ──▶ BuildEvent ──┐
//!                                      ├──▶ mpsc ──▶ ssr::Orchestrator
//! watcher.rs (notify) ──▶ BuildEvent ──┘
//!        ▲ writes bundle JSON
//! bundler (server side)
//! ```
//!
//! # Design Decisions
//! - The orchestrator only sees `BuildEvent`s, never a bundler API
//! - A build is reported as failed when its artifact cannot be read or parsed
//! - Events are tagged with the side they came from

pub mod process;
pub mod watcher;

use std::fmt;

use crate::ssr::artifacts::{ClientManifest, ServerBundle};

pub use process::BundlerProcess;
pub use watcher::ArtifactWatcher;

/// Which bundle a build belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSide {
    /// Browser-targeted bundle, produces the client manifest.
    Client,
    /// Server-targeted bundle, produces the server bundle.
    Server,
}

impl BuildSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildSide::Client => "client",
            BuildSide::Server => "server",
        }
    }
}

impl fmt::Display for BuildSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a successful build.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    ClientManifest(ClientManifest),
    ServerBundle(ServerBundle),
}

impl Artifact {
    pub fn side(&self) -> BuildSide {
        match self {
            Artifact::ClientManifest(_) => BuildSide::Client,
            Artifact::ServerBundle(_) => BuildSide::Server,
        }
    }
}

/// One completed build, as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Succeeded {
        artifact: Artifact,
        warnings: Vec<String>,
    },
    Failed {
        side: BuildSide,
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

impl BuildEvent {
    pub fn succeeded(artifact: Artifact) -> Self {
        BuildEvent::Succeeded {
            artifact,
            warnings: Vec::new(),
        }
    }

    pub fn failed(side: BuildSide, errors: Vec<String>) -> Self {
        BuildEvent::Failed {
            side,
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn side(&self) -> BuildSide {
        match self {
            BuildEvent::Succeeded { artifact, .. } => artifact.side(),
            BuildEvent::Failed { side, .. } => *side,
        }
    }
}

/// Errors that stop a build watcher for good.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot watch {side} artifact: {source}")]
    Watch {
        side: BuildSide,
        #[source]
        source: notify::Error,
    },

    #[error("cannot start {side} bundler: {source}")]
    Spawn {
        side: BuildSide,
        #[source]
        source: std::io::Error,
    },

    #[error("{side} bundler exited with {status}")]
    BundlerExited { side: BuildSide, status: String },
}
