// src/pipelines/contexts.rs

//! Data carried through each pipeline run. Handlers wrap these in `ContextData` and read
//! the outcome back after the run.

use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Cart, CartItem, CheckoutLine, CheckoutReceipt};
use crate::store::Store;

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub store: Arc<dyn Store>,
  pub user_id: Uuid,
  pub product_id: i32,
  pub quantity: i32,
  pub cart: Option<Cart>,
  pub existing_item: Option<CartItem>,
  pub cart_item: Option<CartItem>,
  /// `true` when the run inserted a new line rather than overwriting one.
  pub created: bool,
}

impl AddToCartCtxData {
  pub fn new(store: Arc<dyn Store>, user_id: Uuid, product_id: i32, quantity: i32) -> Self {
    Self {
      store,
      user_id,
      product_id,
      quantity,
      cart: None,
      existing_item: None,
      cart_item: None,
      created: false,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub store: Arc<dyn Store>,
  pub user_id: Uuid,
  pub cart_id: i32,
  pub amount: i64,
  pub cart: Option<Cart>,
  pub lines: Vec<CheckoutLine>,
  pub receipt: Option<CheckoutReceipt>,
}

impl CheckoutCtxData {
  pub fn new(store: Arc<dyn Store>, user_id: Uuid, cart_id: i32, amount: i64) -> Self {
    Self {
      store,
      user_id,
      cart_id,
      amount,
      cart: None,
      lines: Vec::new(),
      receipt: None,
    }
  }
}
