//! Blog resource wrappers.

use std::sync::Arc;

use crate::api::client::{ApiClient, ApiResponse};
use crate::api::error::ApiError;

/// Read-only access to published blogs.
#[derive(Debug, Clone)]
pub struct BlogResource {
    client: Arc<ApiClient>,
}

impl BlogResource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /blogs`
    pub async fn get_blogs(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("/blogs").await
    }

    /// `GET /blogs/{id}`
    pub async fn get_blog_by_id(&self, id: &str) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("/blogs/{}", id)).await
    }

    /// `GET /blogs/archives`
    pub async fn get_blogs_by_archives(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("/blogs/archives").await
    }
}
