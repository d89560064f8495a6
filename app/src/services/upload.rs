// src/services/upload.rs

//! Image upload to the media host. Handlers only see the [`Uploader`] trait.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::CloudinaryConfig;

/// A file part taken from a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
  pub file_name: String,
  /// May be empty when the client sent no type.
  pub content_type: String,
  pub bytes: Vec<u8>,
}

impl ImageFile {
  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

impl std::fmt::Debug for ImageFile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ImageFile")
      .field("file_name", &self.file_name)
      .field("content_type", &self.content_type)
      .field("size", &self.bytes.len())
      .finish()
  }
}

#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
  pub folder: String,
  pub tags: Vec<String>,
}

impl UploadOptions {
  pub fn folder(folder: impl Into<String>) -> Self {
    Self {
      folder: folder.into(),
      tags: Vec::new(),
    }
  }
}

#[derive(Debug, Error)]
pub enum UploadError {
  #[error("Image uploads are not configured")]
  NotConfigured,

  #[error("Media host request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Media host rejected the upload ({status}): {message}")]
  Rejected { status: u16, message: String },
}

#[async_trait]
pub trait Uploader: Send + Sync {
  /// Uploads `file` and returns its public URL.
  async fn upload(&self, file: ImageFile, options: UploadOptions) -> Result<String, UploadError>;
}

/// Used when no media host is configured.
pub struct DisabledUploader;

#[async_trait]
impl Uploader for DisabledUploader {
  async fn upload(&self, file: ImageFile, _options: UploadOptions) -> Result<String, UploadError> {
    warn!(file_name = %file.file_name, "Upload attempted but no media host is configured.");
    Err(UploadError::NotConfigured)
  }
}

#[derive(Deserialize)]
struct UploadResponse {
  secure_url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
  error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
  message: String,
}

/// Unsigned uploads to Cloudinary through an upload preset.
pub struct CloudinaryUploader {
  client: reqwest::Client,
  endpoint: String,
  upload_preset: String,
}

impl CloudinaryUploader {
  pub fn new(config: &CloudinaryConfig) -> Self {
    Self::with_client(reqwest::Client::new(), config)
  }

  pub fn with_client(client: reqwest::Client, config: &CloudinaryConfig) -> Self {
    Self {
      client,
      endpoint: format!(
        "{}/{}/auto/upload",
        config.api_base.trim_end_matches('/'),
        config.cloud_name
      ),
      upload_preset: config.upload_preset.clone(),
    }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl Uploader for CloudinaryUploader {
  #[instrument(name = "cloudinary::upload", skip(self, file), fields(file_name = %file.file_name, folder = %options.folder))]
  async fn upload(&self, file: ImageFile, options: UploadOptions) -> Result<String, UploadError> {
    let mut part = Part::bytes(file.bytes).file_name(file.file_name);
    if !file.content_type.is_empty() {
      part = part.mime_str(&file.content_type)?;
    }

    let mut form = Form::new()
      .part("file", part)
      .text("upload_preset", self.upload_preset.clone())
      .text("folder", options.folder);
    if !options.tags.is_empty() {
      form = form.text("tags", options.tags.join(","));
    }

    let response = self.client.post(&self.endpoint).multipart(form).send().await?;
    let status = response.status();
    if !status.is_success() {
      let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
      };
      warn!(status = status.as_u16(), %message, "Media host rejected upload.");
      return Err(UploadError::Rejected {
        status: status.as_u16(),
        message,
      });
    }

    let body: UploadResponse = response.json().await?;
    info!(url = %body.secure_url, "Image uploaded.");
    Ok(body.secure_url)
  }
}
