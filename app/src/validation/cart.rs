// src/validation/cart.rs
use serde::Deserialize;

use super::{required, FieldErrors, REQUIRED};

pub const QUANTITY_TOO_SMALL: &str = "Quantity must be at least 1";
pub const QUANTITY_TOO_LARGE: &str = "Quantity is too large";

/// Body of `POST /carts` and `PUT /carts/{item_id}`. `product_id` is only read on create.
#[derive(Debug, Default, Deserialize)]
pub struct CartItemInput {
  pub product_id: Option<i32>,
  pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
  pub product_id: i32,
  pub quantity: i32,
}

pub fn validate_new_item(input: CartItemInput) -> Result<NewCartItem, FieldErrors> {
  let mut errors = FieldErrors::new();
  let product_id = required(&mut errors, "product_id", input.product_id, REQUIRED);
  let quantity = check_quantity(&mut errors, input.quantity);

  match (product_id, quantity) {
    (Some(product_id), Some(quantity)) => Ok(NewCartItem { product_id, quantity }),
    _ => Err(errors),
  }
}

pub fn validate_quantity(input: CartItemInput) -> Result<i32, FieldErrors> {
  let mut errors = FieldErrors::new();
  check_quantity(&mut errors, input.quantity).ok_or(errors)
}

fn check_quantity(errors: &mut FieldErrors, quantity: Option<i64>) -> Option<i32> {
  let quantity = required(errors, "quantity", quantity, REQUIRED)?;
  if quantity < 1 {
    errors.add("quantity", QUANTITY_TOO_SMALL);
    return None;
  }
  match i32::try_from(quantity) {
    Ok(quantity) => Some(quantity),
    Err(_) => {
      errors.add("quantity", QUANTITY_TOO_LARGE);
      None
    }
  }
}
