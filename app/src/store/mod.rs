// src/store/mod.rs

//! Datastore boundary. Handlers and pipelines only see the [`Store`] trait; `PgStore` backs
//! production and `MemoryStore` backs tests and database-less development.

pub mod lookup;
pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
  Cart, CartItem, CartItemDetail, Category, CheckoutReceipt, NewCategory, NewCheckout, Order, OrderStatus, Page,
  PageRequest, Product, ProductDraft, ProductFilter, Session, TransactionDetail, User, UserProfile,
};

pub use lookup::{fetch, Fetched};
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  /// A write would break a reference between rows (foreign key, uniqueness).
  #[error("Constraint violated: {0}")]
  Constraint(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD per entity plus the atomic checkout. Operations keyed by id return `Ok(None)`
/// when the row does not exist.
#[async_trait]
pub trait Store: Send + Sync {
  // Categories
  async fn list_categories(&self, page: PageRequest) -> StoreResult<Page<Category>>;
  async fn get_category(&self, id: i32) -> StoreResult<Option<Category>>;
  async fn create_category(&self, category: NewCategory) -> StoreResult<Category>;
  async fn update_category(&self, id: i32, category: NewCategory) -> StoreResult<Option<Category>>;
  async fn delete_category(&self, id: i32) -> StoreResult<Option<Category>>;

  // Products
  async fn list_products(&self, filter: ProductFilter, page: PageRequest) -> StoreResult<Page<Product>>;
  async fn get_product(&self, id: i32) -> StoreResult<Option<Product>>;
  async fn create_product(&self, product: ProductDraft) -> StoreResult<Product>;
  async fn update_product(&self, id: i32, product: ProductDraft) -> StoreResult<Option<Product>>;
  async fn delete_product(&self, id: i32) -> StoreResult<Option<Product>>;

  // Carts; item operations are scoped by cart id so callers can only reach their own lines.
  async fn upsert_cart(&self, user_id: Uuid) -> StoreResult<Cart>;
  async fn find_cart(&self, cart_id: i32) -> StoreResult<Option<Cart>>;
  async fn find_cart_for_user(&self, user_id: Uuid) -> StoreResult<Option<Cart>>;
  async fn list_cart_items(&self, cart_id: i32) -> StoreResult<Vec<CartItemDetail>>;
  async fn find_cart_item(&self, cart_id: i32, product_id: i32) -> StoreResult<Option<CartItem>>;
  async fn get_cart_item(&self, cart_id: i32, item_id: i32) -> StoreResult<Option<CartItemDetail>>;
  async fn create_cart_item(&self, cart_id: i32, product_id: i32, quantity: i32) -> StoreResult<CartItem>;
  async fn update_cart_item(&self, cart_id: i32, item_id: i32, quantity: i32) -> StoreResult<Option<CartItem>>;
  async fn delete_cart_item(&self, cart_id: i32, item_id: i32) -> StoreResult<Option<CartItem>>;

  // Transactions
  /// Writes transaction, order and order items and empties the cart, all or nothing.
  async fn commit_checkout(&self, checkout: NewCheckout) -> StoreResult<CheckoutReceipt>;
  async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<TransactionDetail>>;
  async fn update_order_status(&self, transaction_id: Uuid, status: OrderStatus) -> StoreResult<Option<Order>>;

  // Users
  async fn list_users(&self, page: PageRequest) -> StoreResult<Page<User>>;
  async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;
  async fn update_user(&self, id: Uuid, profile: UserProfile) -> StoreResult<Option<User>>;

  /// Session rows are written by the authentication provider.
  async fn find_session(&self, token: &str) -> StoreResult<Option<Session>>;
}
