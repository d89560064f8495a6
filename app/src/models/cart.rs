// src/models/cart.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One cart per user, created on first access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Cart {
  pub id: i32,
  pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartItem {
  pub id: i32,
  pub cart_id: i32,
  pub product_id: i32,
  pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
  pub name: String,
  pub price: String,
  pub image: Option<String>,
}

/// A cart line joined with the product it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemDetail {
  pub id: i32,
  pub cart_id: i32,
  pub product_id: i32,
  pub quantity: i32,
  pub product: ProductSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
  pub id: i32,
  pub user_id: Uuid,
  pub cart_items: Vec<CartItemDetail>,
}

impl CartView {
  pub fn new(cart: Cart, cart_items: Vec<CartItemDetail>) -> Self {
    Self {
      id: cart.id,
      user_id: cart.user_id,
      cart_items,
    }
  }
}
