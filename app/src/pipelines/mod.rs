// src/pipelines/mod.rs

//! Defines and registers the multi-step flows that run on the workflow engine.

use crate::errors::AppError;
use storefront_core::{FlowError, FlowRegistry};

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod contexts;

/// Registers every pipeline. Called once while building `AppState`.
pub fn register_all_pipelines(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  tracing::info!("Registering pipelines...");

  cart_pipeline::register_add_to_cart_pipeline(registry)?;
  checkout_pipeline::register_checkout_pipeline(registry)?;

  tracing::info!("All application pipelines registered.");
  Ok(())
}
