//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → one of:
//!         /dist/*  → static files (cache directive)
//!         /api/*   → upstream (unchanged)
//!         /__hmr   → hot_reload.rs (renderer change events)
//!         *        → SSR render
//!     → response.rs (fixed error responses)
//!     → Send to client
//! ```

pub mod hot_reload;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{DevServer, ServerError};
