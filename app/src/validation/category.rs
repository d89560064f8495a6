// src/validation/category.rs
use serde::Deserialize;

use super::{char_count, required, FieldErrors, REQUIRED};
use crate::models::NewCategory;

pub const NAME_TOO_SHORT: &str = "Category name must be at least 3 characters long";

#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
  pub name: Option<String>,
}

pub fn validate_category(input: CategoryInput) -> Result<NewCategory, FieldErrors> {
  let mut errors = FieldErrors::new();
  let name = required(&mut errors, "name", input.name, REQUIRED);

  if let Some(name) = &name {
    if char_count(name) < 3 {
      errors.add("name", NAME_TOO_SHORT);
    }
  }

  match name {
    Some(name) if errors.is_empty() => Ok(NewCategory { name }),
    _ => Err(errors),
  }
}
