//! `/upload` endpoints for product images.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::UploadedImages;

/// An image file received from an admin form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The stored file name of an uploaded image URL (its last path segment).
#[must_use]
pub fn upload_file_name(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

impl ApiClient {
    /// `POST /upload/product`: multipart field `images`, one part per file.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_product_images(
        &self,
        files: Vec<ImageFile>,
    ) -> Result<Vec<String>, ApiError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            form = form.part("images", part);
        }
        let uploaded: UploadedImages = self
            .post_multipart(self.endpoint(&["upload", "product"]), form)
            .await?;
        Ok(uploaded.urls)
    }

    /// `DELETE /upload/product/{filename}`
    #[instrument(skip(self))]
    pub async fn delete_product_image(&self, file_name: &str) -> Result<(), ApiError> {
        self.send_unit(
            Method::DELETE,
            self.endpoint(&["upload", "product", file_name]),
        )
        .await
    }
}
