// src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::{SessionProvider, Uploader};
use crate::store::Store;
use std::sync::Arc;
use storefront_core::FlowRegistry;

/// Everything a handler may touch, passed explicitly through actix's `Data`.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub sessions: Arc<dyn SessionProvider>,
  pub uploader: Arc<dyn Uploader>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers the cart and checkout pipelines.
  pub fn new(
    config: Arc<AppConfig>,
    store: Arc<dyn Store>,
    sessions: Arc<dyn SessionProvider>,
    uploader: Arc<dyn Uploader>,
  ) -> Result<Self, AppError> {
    let flows = FlowRegistry::<AppError>::new();
    pipelines::register_all_pipelines(&flows)?;
    Ok(Self {
      store,
      sessions,
      uploader,
      flows: Arc::new(flows),
      config,
    })
  }
}
