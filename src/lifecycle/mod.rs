//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build pipeline (watchers, bundlers, orchestrator) → Listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Stop orchestrator and bundlers → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start_build_pipeline, BuildPipeline};
