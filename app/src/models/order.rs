// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::UserContact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Pending,
  PaymentDue,
  Paid,
  Failed,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::PaymentDue,
    OrderStatus::Paid,
    OrderStatus::Failed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::PaymentDue => "payment_due",
      OrderStatus::Paid => "paid",
      OrderStatus::Failed => "failed",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
  type Err = UnknownStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| UnknownStatus(s.to_string()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Transaction {
  pub id: Uuid,
  pub amount: i64,
  pub cart_id: i32,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

/// Written together with its transaction; one order per transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
  pub id: i32,
  pub transaction_id: Uuid,
  pub total: i64,
  pub status: OrderStatus,
}

/// Snapshot of a cart line at checkout, price included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i32,
  pub order_id: i32,
  pub product_id: i32,
  pub quantity: i32,
  pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
  /// The cart row this line was read from; only these rows leave the cart on commit.
  pub cart_item_id: i32,
  pub product_id: i32,
  pub quantity: i32,
  pub price: String,
}

/// Everything one checkout writes, committed as a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckout {
  pub user_id: Uuid,
  pub cart_id: i32,
  pub amount: i64,
  pub lines: Vec<CheckoutLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
  pub transaction: Transaction,
  pub order: Order,
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductBrief {
  pub id: i32,
  pub name: String,
  pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemDetail {
  pub id: i32,
  pub quantity: i32,
  pub price: String,
  pub product: ProductBrief,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
  pub id: i32,
  pub total: i64,
  pub status: OrderStatus,
  pub items: Vec<OrderItemDetail>,
}

/// Admin view of a transaction with its buyer and order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDetail {
  pub id: Uuid,
  pub amount: i64,
  pub cart_id: i32,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub user: Option<UserContact>,
  pub order: Option<OrderDetail>,
}

impl TransactionDetail {
  pub fn new(transaction: Transaction, user: Option<UserContact>, order: Option<OrderDetail>) -> Self {
    Self {
      id: transaction.id,
      amount: transaction.amount,
      cart_id: transaction.cart_id,
      user_id: transaction.user_id,
      created_at: transaction.created_at,
      user,
      order,
    }
  }
}
