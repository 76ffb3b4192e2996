//! Upload resource wrappers.

use std::sync::Arc;

use crate::api::client::{ApiClient, ApiResponse, FilePart, Payload};
use crate::api::error::ApiError;

/// File uploads used by the admin console.
#[derive(Debug, Clone)]
pub struct UploadResource {
    client: Arc<ApiClient>,
}

impl UploadResource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /uploads/pictures` with `file` as the multipart body.
    pub async fn upload_img(&self, file: FilePart) -> Result<ApiResponse, ApiError> {
        self.client.post("/uploads/pictures", Payload::File(file)).await
    }
}
