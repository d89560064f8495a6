// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Product {
  pub id: i32,
  pub name: String,
  pub description: String,
  /// Decimal kept as entered; never coerced to a number.
  pub price: String,
  pub image: Option<String>,
  pub category_id: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Validated product fields. On update an `image` of `None` keeps the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
  pub name: String,
  pub description: String,
  pub price: String,
  pub category_id: i32,
  pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
  pub category_id: Option<i32>,
}
