// src/store/postgres.rs

//! `Store` over a Postgres pool. Queries are checked at runtime (`query_as`) so the crate
//! builds without a live database. Table layout lives in `schema.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::order::ProductBrief;
use crate::models::{
  Cart, CartItem, CartItemDetail, Category, CheckoutReceipt, NewCategory, NewCheckout, Order, OrderDetail, OrderItem,
  OrderItemDetail, OrderStatus, Page, PageRequest, Product, ProductDraft, ProductFilter, ProductSummary, Session,
  SessionUser, Transaction, TransactionDetail, User, UserContact, UserProfile,
};

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn map_db_error(e: sqlx::Error) -> StoreError {
  if let sqlx::Error::Database(db_err) = &e {
    if db_err.is_foreign_key_violation() || db_err.is_unique_violation() {
      return StoreError::Constraint(db_err.message().to_string());
    }
  }
  StoreError::Database(e)
}

#[derive(FromRow)]
struct CartItemRow {
  id: i32,
  cart_id: i32,
  product_id: i32,
  quantity: i32,
  product_name: String,
  product_price: String,
  product_image: Option<String>,
}

impl From<CartItemRow> for CartItemDetail {
  fn from(row: CartItemRow) -> Self {
    CartItemDetail {
      id: row.id,
      cart_id: row.cart_id,
      product_id: row.product_id,
      quantity: row.quantity,
      product: ProductSummary {
        name: row.product_name,
        price: row.product_price,
        image: row.product_image,
      },
    }
  }
}

#[derive(FromRow)]
struct OrderItemRow {
  id: i32,
  quantity: i32,
  price: String,
  product_id: i32,
  product_name: String,
  product_image: Option<String>,
}

impl From<OrderItemRow> for OrderItemDetail {
  fn from(row: OrderItemRow) -> Self {
    OrderItemDetail {
      id: row.id,
      quantity: row.quantity,
      price: row.price,
      product: ProductBrief {
        id: row.product_id,
        name: row.product_name,
        image: row.product_image,
      },
    }
  }
}

#[derive(FromRow)]
struct SessionRow {
  session_token: String,
  user_id: Uuid,
  role: String,
  name: Option<String>,
  email: Option<String>,
}

const CART_ITEM_DETAIL_SELECT: &str = "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, \
   p.name AS product_name, p.price AS product_price, p.image AS product_image \
   FROM cart_items ci JOIN products p ON p.id = ci.product_id";

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "pg::list_categories", skip(self))]
  async fn list_categories(&self, page: PageRequest) -> StoreResult<Page<Category>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
      .fetch_one(&self.pool)
      .await?;
    let items: Vec<Category> =
      sqlx::query_as("SELECT id, name, created_at, updated_at FROM categories ORDER BY id LIMIT $1 OFFSET $2")
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
    Ok(Page::new(items, total, page))
  }

  async fn get_category(&self, id: i32) -> StoreResult<Option<Category>> {
    let category = sqlx::query_as("SELECT id, name, created_at, updated_at FROM categories WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(category)
  }

  async fn create_category(&self, category: NewCategory) -> StoreResult<Category> {
    sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id, name, created_at, updated_at")
      .bind(category.name)
      .fetch_one(&self.pool)
      .await
      .map_err(map_db_error)
  }

  async fn update_category(&self, id: i32, category: NewCategory) -> StoreResult<Option<Category>> {
    sqlx::query_as(
      "UPDATE categories SET name = $1, updated_at = NOW() WHERE id = $2 \
       RETURNING id, name, created_at, updated_at",
    )
    .bind(category.name)
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn delete_category(&self, id: i32) -> StoreResult<Option<Category>> {
    sqlx::query_as("DELETE FROM categories WHERE id = $1 RETURNING id, name, created_at, updated_at")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_db_error)
  }

  #[instrument(name = "pg::list_products", skip(self))]
  async fn list_products(&self, filter: ProductFilter, page: PageRequest) -> StoreResult<Page<Product>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE ($1::int IS NULL OR category_id = $1)")
      .bind(filter.category_id)
      .fetch_one(&self.pool)
      .await?;
    let items: Vec<Product> = sqlx::query_as(
      "SELECT id, name, description, price, image, category_id, created_at, updated_at FROM products \
       WHERE ($1::int IS NULL OR category_id = $1) ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(filter.category_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;
    Ok(Page::new(items, total, page))
  }

  async fn get_product(&self, id: i32) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as(
      "SELECT id, name, description, price, image, category_id, created_at, updated_at FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn create_product(&self, product: ProductDraft) -> StoreResult<Product> {
    sqlx::query_as(
      "INSERT INTO products (name, description, price, image, category_id) VALUES ($1, $2, $3, $4, $5) \
       RETURNING id, name, description, price, image, category_id, created_at, updated_at",
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.image)
    .bind(product.category_id)
    .fetch_one(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn update_product(&self, id: i32, product: ProductDraft) -> StoreResult<Option<Product>> {
    sqlx::query_as(
      "UPDATE products SET name = $1, description = $2, price = $3, image = COALESCE($4, image), \
       category_id = $5, updated_at = NOW() WHERE id = $6 \
       RETURNING id, name, description, price, image, category_id, created_at, updated_at",
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.image)
    .bind(product.category_id)
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn delete_product(&self, id: i32) -> StoreResult<Option<Product>> {
    sqlx::query_as(
      "DELETE FROM products WHERE id = $1 \
       RETURNING id, name, description, price, image, category_id, created_at, updated_at",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn upsert_cart(&self, user_id: Uuid) -> StoreResult<Cart> {
    sqlx::query_as(
      "INSERT INTO carts (user_id) VALUES ($1) \
       ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id RETURNING id, user_id",
    )
    .bind(user_id)
    .fetch_one(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn find_cart(&self, cart_id: i32) -> StoreResult<Option<Cart>> {
    let cart = sqlx::query_as("SELECT id, user_id FROM carts WHERE id = $1")
      .bind(cart_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn find_cart_for_user(&self, user_id: Uuid) -> StoreResult<Option<Cart>> {
    let cart = sqlx::query_as("SELECT id, user_id FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn list_cart_items(&self, cart_id: i32) -> StoreResult<Vec<CartItemDetail>> {
    let sql = format!("{} WHERE ci.cart_id = $1 ORDER BY ci.id", CART_ITEM_DETAIL_SELECT);
    let rows: Vec<CartItemRow> = sqlx::query_as(&sql).bind(cart_id).fetch_all(&self.pool).await?;
    Ok(rows.into_iter().map(CartItemDetail::from).collect())
  }

  async fn find_cart_item(&self, cart_id: i32, product_id: i32) -> StoreResult<Option<CartItem>> {
    let item = sqlx::query_as(
      "SELECT id, cart_id, product_id, quantity FROM cart_items WHERE cart_id = $1 AND product_id = $2",
    )
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(item)
  }

  async fn get_cart_item(&self, cart_id: i32, item_id: i32) -> StoreResult<Option<CartItemDetail>> {
    let sql = format!("{} WHERE ci.cart_id = $1 AND ci.id = $2", CART_ITEM_DETAIL_SELECT);
    let row: Option<CartItemRow> = sqlx::query_as(&sql)
      .bind(cart_id)
      .bind(item_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(CartItemDetail::from))
  }

  async fn create_cart_item(&self, cart_id: i32, product_id: i32, quantity: i32) -> StoreResult<CartItem> {
    sqlx::query_as(
      "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
       RETURNING id, cart_id, product_id, quantity",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn update_cart_item(&self, cart_id: i32, item_id: i32, quantity: i32) -> StoreResult<Option<CartItem>> {
    sqlx::query_as(
      "UPDATE cart_items SET quantity = $1 WHERE id = $2 AND cart_id = $3 \
       RETURNING id, cart_id, product_id, quantity",
    )
    .bind(quantity)
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn delete_cart_item(&self, cart_id: i32, item_id: i32) -> StoreResult<Option<CartItem>> {
    sqlx::query_as(
      "DELETE FROM cart_items WHERE id = $1 AND cart_id = $2 RETURNING id, cart_id, product_id, quantity",
    )
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  #[instrument(
    name = "pg::commit_checkout",
    skip(self, checkout),
    fields(cart_id = checkout.cart_id, user_id = %checkout.user_id, lines = checkout.lines.len())
  )]
  async fn commit_checkout(&self, checkout: NewCheckout) -> StoreResult<CheckoutReceipt> {
    let collected: Vec<i32> = checkout.lines.iter().map(|line| line.cart_item_id).collect();
    // Dropping `tx` before commit rolls every statement back.
    let mut tx = self.pool.begin().await?;

    let transaction: Transaction = sqlx::query_as(
      "INSERT INTO transactions (id, amount, cart_id, user_id) VALUES ($1, $2, $3, $4) \
       RETURNING id, amount, cart_id, user_id, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(checkout.amount)
    .bind(checkout.cart_id)
    .bind(checkout.user_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_db_error)?;

    let order: Order = sqlx::query_as(
      "INSERT INTO orders (transaction_id, total, status) VALUES ($1, $2, $3) \
       RETURNING id, transaction_id, total, status",
    )
    .bind(transaction.id)
    .bind(checkout.amount)
    .bind(OrderStatus::Pending)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_db_error)?;

    let mut items = Vec::with_capacity(checkout.lines.len());
    for line in &checkout.lines {
      let item: OrderItem = sqlx::query_as(
        "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4) \
         RETURNING id, order_id, product_id, quantity, price",
      )
      .bind(order.id)
      .bind(line.product_id)
      .bind(line.quantity)
      .bind(&line.price)
      .fetch_one(&mut *tx)
      .await
      .map_err(map_db_error)?;
      items.push(item);
    }

    // Lines added after collection stay in the cart.
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND id = ANY($2)")
      .bind(checkout.cart_id)
      .bind(&collected)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    info!(transaction_id = %transaction.id, order_id = order.id, "Checkout committed.");

    Ok(CheckoutReceipt {
      transaction,
      order,
      items,
    })
  }

  async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<TransactionDetail>> {
    let transaction: Option<Transaction> =
      sqlx::query_as("SELECT id, amount, cart_id, user_id, created_at FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
    let Some(transaction) = transaction else {
      return Ok(None);
    };

    let user: Option<UserContact> = sqlx::query_as("SELECT email, name, address FROM users WHERE id = $1")
      .bind(transaction.user_id)
      .fetch_optional(&self.pool)
      .await?;

    let order: Option<Order> =
      sqlx::query_as("SELECT id, transaction_id, total, status FROM orders WHERE transaction_id = $1")
        .bind(transaction.id)
        .fetch_optional(&self.pool)
        .await?;

    let order = match order {
      Some(order) => {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
          "SELECT oi.id, oi.quantity, oi.price, p.id AS product_id, p.name AS product_name, \
           p.image AS product_image FROM order_items oi JOIN products p ON p.id = oi.product_id \
           WHERE oi.order_id = $1 ORDER BY oi.id",
        )
        .bind(order.id)
        .fetch_all(&self.pool)
        .await?;
        Some(OrderDetail {
          id: order.id,
          total: order.total,
          status: order.status,
          items: rows.into_iter().map(OrderItemDetail::from).collect(),
        })
      }
      None => None,
    };

    Ok(Some(TransactionDetail::new(transaction, user, order)))
  }

  async fn update_order_status(&self, transaction_id: Uuid, status: OrderStatus) -> StoreResult<Option<Order>> {
    sqlx::query_as(
      "UPDATE orders SET status = $1 WHERE transaction_id = $2 RETURNING id, transaction_id, total, status",
    )
    .bind(status)
    .bind(transaction_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn list_users(&self, page: PageRequest) -> StoreResult<Page<User>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&self.pool).await?;
    let items: Vec<User> =
      sqlx::query_as("SELECT id, name, email, address, image, role FROM users ORDER BY email LIMIT $1 OFFSET $2")
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
    Ok(Page::new(items, total, page))
  }

  async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    let user = sqlx::query_as("SELECT id, name, email, address, image, role FROM users WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn update_user(&self, id: Uuid, profile: UserProfile) -> StoreResult<Option<User>> {
    sqlx::query_as(
      "UPDATE users SET name = $1, address = $2, image = COALESCE($3, image) WHERE id = $4 \
       RETURNING id, name, email, address, image, role",
    )
    .bind(profile.name)
    .bind(profile.address)
    .bind(profile.image)
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_db_error)
  }

  async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
    let now: DateTime<Utc> = Utc::now();
    let row: Option<SessionRow> = sqlx::query_as(
      "SELECT s.session_token, u.id AS user_id, u.role, u.name, u.email FROM sessions s \
       JOIN users u ON u.id = s.user_id WHERE s.session_token = $1 AND s.expires > $2",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(|row| Session {
      token: row.session_token,
      user: SessionUser {
        id: row.user_id,
        role: row.role,
        name: row.name,
        email: row.email,
      },
    }))
  }
}
