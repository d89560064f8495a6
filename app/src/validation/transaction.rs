// src/validation/transaction.rs
use serde::Deserialize;

use super::{required, FieldErrors, REQUIRED};
use crate::models::OrderStatus;

pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than 0";
pub const STATUS_INVALID: &str =
  "Status must be one of pending, payment_due, paid, failed, shipped, delivered, cancelled";

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutInput {
  pub amount: Option<i64>,
  pub cart_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutRequest {
  pub amount: i64,
  pub cart_id: i32,
}

pub fn validate_checkout(input: CheckoutInput) -> Result<CheckoutRequest, FieldErrors> {
  let mut errors = FieldErrors::new();

  let amount = required(&mut errors, "amount", input.amount, REQUIRED).filter(|amount| {
    let positive = *amount > 0;
    if !positive {
      errors.add("amount", AMOUNT_NOT_POSITIVE);
    }
    positive
  });
  let cart_id = required(&mut errors, "cart_id", input.cart_id, REQUIRED);

  match (amount, cart_id) {
    (Some(amount), Some(cart_id)) => Ok(CheckoutRequest { amount, cart_id }),
    _ => Err(errors),
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderStatusInput {
  pub status: Option<String>,
}

pub fn validate_order_status(input: OrderStatusInput) -> Result<OrderStatus, FieldErrors> {
  let mut errors = FieldErrors::new();
  let status = required(&mut errors, "status", input.status, REQUIRED).and_then(|raw| match raw.parse() {
    Ok(status) => Some(status),
    Err(_) => {
      errors.add("status", STATUS_INVALID);
      None
    }
  });
  status.ok_or(errors)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn checkout_requires_positive_amount_and_cart() {
    let errors = validate_checkout(CheckoutInput {
      amount: Some(0),
      cart_id: None,
    })
    .unwrap_err();
    assert_eq!(errors.get("amount"), Some(&[AMOUNT_NOT_POSITIVE.to_string()][..]));
    assert_eq!(errors.get("cart_id"), Some(&[REQUIRED.to_string()][..]));

    assert_eq!(
      validate_checkout(CheckoutInput {
        amount: Some(1500),
        cart_id: Some(2),
      }),
      Ok(CheckoutRequest {
        amount: 1500,
        cart_id: 2
      })
    );
  }

  #[test]
  fn order_status_must_be_known() {
    assert_eq!(
      validate_order_status(OrderStatusInput {
        status: Some("shipped".to_string()),
      }),
      Ok(OrderStatus::Shipped)
    );

    let errors = validate_order_status(OrderStatusInput {
      status: Some("lost".to_string()),
    })
    .unwrap_err();
    assert_eq!(errors.get("status"), Some(&[STATUS_INVALID.to_string()][..]));

    let errors = validate_order_status(OrderStatusInput::default()).unwrap_err();
    assert_eq!(errors.get("status"), Some(&[REQUIRED.to_string()][..]));
  }
}
