// src/lib.rs

//! Storefront flow engine: small async step pipelines for multi-step business operations.
//!
//! A pipeline is an ordered list of named steps. Each step may carry `before`, `on` and
//! `after` handlers which receive a shared [`ContextData`] and decide whether the run
//! continues or stops. Steps can be optional (no handlers is fine) or skipped by a
//! condition evaluated against the context. A [`FlowRegistry`] keeps one pipeline per
//! context type so callers only need the context to dispatch a run.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::definition::Pipeline;
pub use crate::registry::FlowRegistry;
