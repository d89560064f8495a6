// src/errors.rs

use actix_web::http::{Method, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

use storefront_core::FlowError;

use crate::services::upload::UploadError;
use crate::store::StoreError;
use crate::validation::FieldErrors;
use crate::web::envelope::Envelope;

pub const INTERNAL_MESSAGE: &str = "An error has occurred, please try again later";
pub const UNAUTHORIZED_MESSAGE: &str = "Not authenticated or unauthorized access";
pub const UNAUTHORIZED_DETAIL: &str = "You are not authenticated or unauthorized to access this resource";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {message}")]
  Validation { message: String, fields: FieldErrors },

  #[error("Authentication Failed")]
  Unauthorized,

  #[error("Resource Not Found: {detail}")]
  NotFound { message: String, detail: String },

  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Datastore Error: {0}")]
  Store(#[from] StoreError),

  #[error("Upload Error: {0}")]
  Upload(#[from] UploadError),

  #[error("Workflow Error: {0}")]
  Workflow(#[from] FlowError),

  #[error("Serialization Error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn invalid(message: impl Into<String>, fields: FieldErrors) -> Self {
    AppError::Validation {
      message: message.into(),
      fields,
    }
  }

  pub fn not_found(message: impl Into<String>, detail: impl Into<String>) -> Self {
    AppError::NotFound {
      message: message.into(),
      detail: detail.into(),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized => StatusCode::UNAUTHORIZED,
      AppError::NotFound { .. } => StatusCode::NOT_FOUND,
      AppError::Store(_)
      | AppError::Upload(_)
      | AppError::Workflow(_)
      | AppError::Serialization(_)
      | AppError::Config(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// The envelope's `message` and `error` members for this error.
  fn parts(&self) -> (String, Value) {
    match self {
      AppError::Validation { message, fields } => (message.clone(), json!(fields)),
      AppError::Unauthorized => (UNAUTHORIZED_MESSAGE.to_string(), json!(UNAUTHORIZED_DETAIL)),
      AppError::NotFound { message, detail } => (message.clone(), json!(detail)),
      AppError::BadRequest(detail) => ("Invalid request, please check your input".to_string(), json!(detail)),
      other => (INTERNAL_MESSAGE.to_string(), json!(other.to_string())),
    }
  }

  pub fn into_envelope(self, method: &Method) -> Envelope {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    let (message, error) = self.parts();
    Envelope::failure(status, message, method, error)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
