// src/lib.rs

//! Storefront backend: carts, categories, products, transactions and users over a
//! relational store, answering every request with the same JSON envelope.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
pub mod web;

pub use errors::AppError;
pub use state::AppState;
pub use web::build_app;
