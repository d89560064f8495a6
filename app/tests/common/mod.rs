// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::test::TestRequest;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::Level;
use uuid::Uuid;

use storefront::config::AppConfig;
use storefront::models::{Category, NewCategory, Product, ProductDraft};
use storefront::services::{ImageFile, StoreSessions, UploadError, UploadOptions, Uploader};
use storefront::store::{MemoryStore, Store};
use storefront::AppState;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const OTHER_CUSTOMER_TOKEN: &str = "other-customer-token";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// An upload seen by [`RecordingUploader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
  pub file_name: String,
  pub folder: String,
  pub size: usize,
}

/// Stands in for the media host. Records every upload and can be told to reject them.
#[derive(Default)]
pub struct RecordingUploader {
  uploads: Mutex<Vec<RecordedUpload>>,
  failing: bool,
}

impl RecordingUploader {
  pub fn failing() -> Self {
    Self {
      uploads: Mutex::new(Vec::new()),
      failing: true,
    }
  }

  pub fn uploads(&self) -> Vec<RecordedUpload> {
    self.uploads.lock().clone()
  }
}

#[async_trait]
impl Uploader for RecordingUploader {
  async fn upload(&self, file: ImageFile, options: UploadOptions) -> Result<String, UploadError> {
    self.uploads.lock().push(RecordedUpload {
      file_name: file.file_name.clone(),
      folder: options.folder.clone(),
      size: file.bytes.len(),
    });
    if self.failing {
      return Err(UploadError::Rejected {
        status: 500,
        message: "media host unavailable".to_string(),
      });
    }
    Ok(format!("https://media.test/{}/{}", options.folder, file.file_name))
  }
}

/// Shared fixture: an in-memory store with an admin and two customers signed in.
pub struct TestHarness {
  pub store: Arc<MemoryStore>,
  pub uploader: Arc<RecordingUploader>,
  pub admin_id: Uuid,
  pub customer_id: Uuid,
  pub other_customer_id: Uuid,
}

impl TestHarness {
  pub fn new() -> Self {
    Self::with_uploader(RecordingUploader::default())
  }

  pub fn with_uploader(uploader: RecordingUploader) -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let admin_id = store.seed_session(ADMIN_TOKEN, "Admin", "admin");
    let customer_id = store.seed_session(CUSTOMER_TOKEN, "Customer", "user");
    let other_customer_id = store.seed_session(OTHER_CUSTOMER_TOKEN, "Other Customer", "user");
    Self {
      store,
      uploader: Arc::new(uploader),
      admin_id,
      customer_id,
      other_customer_id,
    }
  }

  pub fn state(&self) -> AppState {
    let store: Arc<dyn Store> = self.store.clone();
    AppState::new(
      Arc::new(AppConfig::default()),
      store.clone(),
      Arc::new(StoreSessions::new(store)),
      self.uploader.clone(),
    )
    .expect("application state should build")
  }

  pub async fn category(&self, name: &str) -> Category {
    self
      .store
      .create_category(NewCategory { name: name.to_string() })
      .await
      .expect("category should be created")
  }

  pub async fn product(&self, name: &str, price: &str, category_id: i32) -> Product {
    self
      .store
      .create_product(ProductDraft {
        name: name.to_string(),
        description: format!("{} description", name),
        price: price.to_string(),
        image: None,
        category_id,
      })
      .await
      .expect("product should be created")
  }
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
  (AUTHORIZATION, format!("Bearer {}", token))
}

/// Builds a `multipart/form-data` body by hand.
pub struct MultipartBody {
  boundary: String,
  body: Vec<u8>,
}

impl MultipartBody {
  pub fn new() -> Self {
    Self {
      boundary: "storefront-test-boundary".to_string(),
      body: Vec::new(),
    }
  }

  pub fn text(mut self, name: &str, value: &str) -> Self {
    self.body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        self.boundary, name, value
      )
      .as_bytes(),
    );
    self
  }

  pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
    self.body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        self.boundary, name, file_name, content_type
      )
      .as_bytes(),
    );
    self.body.extend_from_slice(bytes);
    self.body.extend_from_slice(b"\r\n");
    self
  }

  /// Attaches the finished body and its content type to `req`.
  pub fn attach(mut self, req: TestRequest) -> TestRequest {
    self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
    req
      .insert_header((CONTENT_TYPE, format!("multipart/form-data; boundary={}", self.boundary)))
      .set_payload(self.body)
  }
}
