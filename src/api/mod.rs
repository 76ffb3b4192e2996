//! API client subsystem.
//!
//! # Data Flow
//! ```text
//! caller (CLI, views)
//!     → blogs.rs / uploads.rs (one function per endpoint)
//!     → client.rs (base URL + timeout, GET/POST)
//!     → backend REST API (directly or through the dev proxy)
//! ```
//!
//! # Design Decisions
//! - Wrappers do no validation, transformation or error translation
//! - One client per application, shared by every wrapper
//! - Errors propagate to the caller untouched

pub mod blogs;
pub mod client;
pub mod error;
pub mod uploads;

pub use blogs::BlogResource;
pub use client::{ApiClient, ApiResponse, FilePart, Payload};
pub use error::ApiError;
pub use uploads::UploadResource;
