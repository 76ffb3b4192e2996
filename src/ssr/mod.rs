//! Server-side rendering subsystem.
//!
//! # Data Flow
//! ```text
//! BuildEvent stream
//!     → orchestrator.rs (artifact pair, lifecycle state)
//!     → renderer.rs (RenderEngine builds a Renderer)
//!     → RendererHandle (atomic swap, generation notifications)
//!     → http::server render handler
//! ```
//!
//! # Design Decisions
//! - Exactly one task mutates artifacts; readers only load an `Arc`
//! - Requests before first readiness wait, later ones never block
//! - The render engine is a trait so other engines can be plugged in

pub mod artifacts;
pub mod orchestrator;
pub mod renderer;

pub use artifacts::{ClientManifest, ServerBundle};
pub use orchestrator::{ActiveRenderer, Orchestrator, OrchestratorState, RendererHandle};
pub use renderer::{RenderContext, RenderEngine, RenderError, Renderer, TemplateEngine};
