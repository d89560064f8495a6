// src/store/memory.rs

//! In-process `Store` for tests and running without a database. All tables sit behind one
//! mutex, so every operation, checkout included, is atomic. Reference checks mirror the
//! foreign keys in `schema.sql`.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::order::ProductBrief;
use crate::models::{
  Cart, CartItem, CartItemDetail, Category, CheckoutReceipt, NewCategory, NewCheckout, Order, OrderDetail, OrderItem,
  OrderItemDetail, OrderStatus, Page, PageRequest, Product, ProductDraft, ProductFilter, ProductSummary, Session,
  SessionUser, Transaction, TransactionDetail, User, UserContact, UserProfile,
};

#[derive(Default)]
struct Tables {
  categories: BTreeMap<i32, Category>,
  products: BTreeMap<i32, Product>,
  carts: BTreeMap<i32, Cart>,
  cart_items: BTreeMap<i32, CartItem>,
  transactions: BTreeMap<Uuid, Transaction>,
  orders: BTreeMap<i32, Order>,
  order_items: BTreeMap<i32, OrderItem>,
  users: BTreeMap<Uuid, User>,
  sessions: BTreeMap<String, Uuid>,
  last_id: i32,
}

impl Tables {
  /// One sequence shared by every serial column.
  fn next_id(&mut self) -> i32 {
    self.last_id += 1;
    self.last_id
  }

  fn cart_item_detail(&self, item: &CartItem) -> Option<CartItemDetail> {
    let product = self.products.get(&item.product_id)?;
    Some(CartItemDetail {
      id: item.id,
      cart_id: item.cart_id,
      product_id: item.product_id,
      quantity: item.quantity,
      product: ProductSummary {
        name: product.name.clone(),
        price: product.price.clone(),
        image: product.image.clone(),
      },
    })
  }

  fn cart_item_in_cart(&self, cart_id: i32, item_id: i32) -> Option<&CartItem> {
    self.cart_items.get(&item_id).filter(|item| item.cart_id == cart_id)
  }

  fn require_category(&self, category_id: i32) -> StoreResult<()> {
    if self.categories.contains_key(&category_id) {
      Ok(())
    } else {
      Err(StoreError::Constraint(format!("category {} does not exist", category_id)))
    }
  }

  fn require_product(&self, product_id: i32) -> StoreResult<()> {
    if self.products.contains_key(&product_id) {
      Ok(())
    } else {
      Err(StoreError::Constraint(format!("product {} does not exist", product_id)))
    }
  }
}

fn paginate<T: Clone>(rows: Vec<&T>, page: PageRequest) -> Page<T> {
  let total = rows.len() as i64;
  let items = rows
    .into_iter()
    .skip(page.offset() as usize)
    .take(page.limit() as usize)
    .cloned()
    .collect();
  Page::new(items, total, page)
}

#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stands in for the authentication provider's user table.
  pub fn insert_user(&self, user: User) {
    self.tables.lock().users.insert(user.id, user);
  }

  /// Stands in for the authentication provider's session table.
  pub fn insert_session(&self, token: impl Into<String>, user_id: Uuid) {
    self.tables.lock().sessions.insert(token.into(), user_id);
  }

  /// Creates a user with `role` and a session for it; returns the user's id.
  pub fn seed_session(&self, token: &str, name: &str, role: &str) -> Uuid {
    let user = User {
      id: Uuid::new_v4(),
      name: Some(name.to_string()),
      email: Some(format!("{}@storefront.local", name.to_lowercase().replace(' ', "."))),
      address: None,
      image: None,
      role: role.to_string(),
    };
    let user_id = user.id;
    self.insert_user(user);
    self.insert_session(token, user_id);
    user_id
  }

  pub fn transaction_count(&self) -> usize {
    self.tables.lock().transactions.len()
  }

  pub fn order_count(&self) -> usize {
    self.tables.lock().orders.len()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn list_categories(&self, page: PageRequest) -> StoreResult<Page<Category>> {
    let tables = self.tables.lock();
    Ok(paginate(tables.categories.values().collect(), page))
  }

  async fn get_category(&self, id: i32) -> StoreResult<Option<Category>> {
    Ok(self.tables.lock().categories.get(&id).cloned())
  }

  async fn create_category(&self, category: NewCategory) -> StoreResult<Category> {
    let mut tables = self.tables.lock();
    let now = Utc::now();
    let created = Category {
      id: tables.next_id(),
      name: category.name,
      created_at: now,
      updated_at: now,
    };
    tables.categories.insert(created.id, created.clone());
    Ok(created)
  }

  async fn update_category(&self, id: i32, category: NewCategory) -> StoreResult<Option<Category>> {
    let mut tables = self.tables.lock();
    Ok(tables.categories.get_mut(&id).map(|existing| {
      existing.name = category.name;
      existing.updated_at = Utc::now();
      existing.clone()
    }))
  }

  async fn delete_category(&self, id: i32) -> StoreResult<Option<Category>> {
    let mut tables = self.tables.lock();
    if tables.products.values().any(|p| p.category_id == id) {
      return Err(StoreError::Constraint(format!("category {} still has products", id)));
    }
    Ok(tables.categories.remove(&id))
  }

  async fn list_products(&self, filter: ProductFilter, page: PageRequest) -> StoreResult<Page<Product>> {
    let tables = self.tables.lock();
    let rows = tables
      .products
      .values()
      .filter(|p| filter.category_id.map_or(true, |category_id| p.category_id == category_id))
      .collect();
    Ok(paginate(rows, page))
  }

  async fn get_product(&self, id: i32) -> StoreResult<Option<Product>> {
    Ok(self.tables.lock().products.get(&id).cloned())
  }

  async fn create_product(&self, product: ProductDraft) -> StoreResult<Product> {
    let mut tables = self.tables.lock();
    tables.require_category(product.category_id)?;
    let now = Utc::now();
    let created = Product {
      id: tables.next_id(),
      name: product.name,
      description: product.description,
      price: product.price,
      image: product.image,
      category_id: product.category_id,
      created_at: now,
      updated_at: now,
    };
    tables.products.insert(created.id, created.clone());
    Ok(created)
  }

  async fn update_product(&self, id: i32, product: ProductDraft) -> StoreResult<Option<Product>> {
    let mut tables = self.tables.lock();
    if !tables.products.contains_key(&id) {
      return Ok(None);
    }
    tables.require_category(product.category_id)?;
    Ok(tables.products.get_mut(&id).map(|existing| {
      existing.name = product.name;
      existing.description = product.description;
      existing.price = product.price;
      if product.image.is_some() {
        existing.image = product.image;
      }
      existing.category_id = product.category_id;
      existing.updated_at = Utc::now();
      existing.clone()
    }))
  }

  async fn delete_product(&self, id: i32) -> StoreResult<Option<Product>> {
    let mut tables = self.tables.lock();
    if tables.order_items.values().any(|item| item.product_id == id) {
      return Err(StoreError::Constraint(format!("product {} is referenced by orders", id)));
    }
    let removed = tables.products.remove(&id);
    if removed.is_some() {
      tables.cart_items.retain(|_, item| item.product_id != id);
    }
    Ok(removed)
  }

  async fn upsert_cart(&self, user_id: Uuid) -> StoreResult<Cart> {
    let mut tables = self.tables.lock();
    if let Some(cart) = tables.carts.values().find(|c| c.user_id == user_id) {
      return Ok(cart.clone());
    }
    let cart = Cart {
      id: tables.next_id(),
      user_id,
    };
    tables.carts.insert(cart.id, cart.clone());
    Ok(cart)
  }

  async fn find_cart(&self, cart_id: i32) -> StoreResult<Option<Cart>> {
    Ok(self.tables.lock().carts.get(&cart_id).cloned())
  }

  async fn find_cart_for_user(&self, user_id: Uuid) -> StoreResult<Option<Cart>> {
    Ok(self.tables.lock().carts.values().find(|c| c.user_id == user_id).cloned())
  }

  async fn list_cart_items(&self, cart_id: i32) -> StoreResult<Vec<CartItemDetail>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .cart_items
        .values()
        .filter(|item| item.cart_id == cart_id)
        .filter_map(|item| tables.cart_item_detail(item))
        .collect(),
    )
  }

  async fn find_cart_item(&self, cart_id: i32, product_id: i32) -> StoreResult<Option<CartItem>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .cart_items
        .values()
        .find(|item| item.cart_id == cart_id && item.product_id == product_id)
        .cloned(),
    )
  }

  async fn get_cart_item(&self, cart_id: i32, item_id: i32) -> StoreResult<Option<CartItemDetail>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .cart_item_in_cart(cart_id, item_id)
        .and_then(|item| tables.cart_item_detail(item)),
    )
  }

  async fn create_cart_item(&self, cart_id: i32, product_id: i32, quantity: i32) -> StoreResult<CartItem> {
    let mut tables = self.tables.lock();
    if !tables.carts.contains_key(&cart_id) {
      return Err(StoreError::Constraint(format!("cart {} does not exist", cart_id)));
    }
    tables.require_product(product_id)?;
    if tables
      .cart_items
      .values()
      .any(|item| item.cart_id == cart_id && item.product_id == product_id)
    {
      return Err(StoreError::Constraint(format!(
        "cart {} already holds product {}",
        cart_id, product_id
      )));
    }
    let item = CartItem {
      id: tables.next_id(),
      cart_id,
      product_id,
      quantity,
    };
    tables.cart_items.insert(item.id, item.clone());
    Ok(item)
  }

  async fn update_cart_item(&self, cart_id: i32, item_id: i32, quantity: i32) -> StoreResult<Option<CartItem>> {
    let mut tables = self.tables.lock();
    Ok(
      tables
        .cart_items
        .get_mut(&item_id)
        .filter(|item| item.cart_id == cart_id)
        .map(|item| {
          item.quantity = quantity;
          item.clone()
        }),
    )
  }

  async fn delete_cart_item(&self, cart_id: i32, item_id: i32) -> StoreResult<Option<CartItem>> {
    let mut tables = self.tables.lock();
    if tables.cart_item_in_cart(cart_id, item_id).is_none() {
      return Ok(None);
    }
    Ok(tables.cart_items.remove(&item_id))
  }

  async fn commit_checkout(&self, checkout: NewCheckout) -> StoreResult<CheckoutReceipt> {
    let mut tables = self.tables.lock();

    // Every reference is checked before the first write.
    if !tables.users.contains_key(&checkout.user_id) {
      return Err(StoreError::Constraint(format!("user {} does not exist", checkout.user_id)));
    }
    if !tables.carts.contains_key(&checkout.cart_id) {
      return Err(StoreError::Constraint(format!("cart {} does not exist", checkout.cart_id)));
    }
    for line in &checkout.lines {
      tables.require_product(line.product_id)?;
    }

    let collected: BTreeSet<i32> = checkout.lines.iter().map(|line| line.cart_item_id).collect();
    let transaction = Transaction {
      id: Uuid::new_v4(),
      amount: checkout.amount,
      cart_id: checkout.cart_id,
      user_id: checkout.user_id,
      created_at: Utc::now(),
    };
    let order = Order {
      id: tables.next_id(),
      transaction_id: transaction.id,
      total: checkout.amount,
      status: OrderStatus::Pending,
    };
    let mut items = Vec::with_capacity(checkout.lines.len());
    for line in checkout.lines {
      items.push(OrderItem {
        id: tables.next_id(),
        order_id: order.id,
        product_id: line.product_id,
        quantity: line.quantity,
        price: line.price,
      });
    }

    tables.transactions.insert(transaction.id, transaction.clone());
    tables.orders.insert(order.id, order.clone());
    for item in &items {
      tables.order_items.insert(item.id, item.clone());
    }
    tables
      .cart_items
      .retain(|id, item| item.cart_id != checkout.cart_id || !collected.contains(id));

    Ok(CheckoutReceipt {
      transaction,
      order,
      items,
    })
  }

  async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<TransactionDetail>> {
    let tables = self.tables.lock();
    let Some(transaction) = tables.transactions.get(&id).cloned() else {
      return Ok(None);
    };

    let user = tables.users.get(&transaction.user_id).map(|u| UserContact {
      email: u.email.clone(),
      name: u.name.clone(),
      address: u.address.clone(),
    });

    let order = tables
      .orders
      .values()
      .find(|o| o.transaction_id == transaction.id)
      .map(|order| OrderDetail {
        id: order.id,
        total: order.total,
        status: order.status,
        items: tables
          .order_items
          .values()
          .filter(|item| item.order_id == order.id)
          .filter_map(|item| {
            let product = tables.products.get(&item.product_id)?;
            Some(OrderItemDetail {
              id: item.id,
              quantity: item.quantity,
              price: item.price.clone(),
              product: ProductBrief {
                id: product.id,
                name: product.name.clone(),
                image: product.image.clone(),
              },
            })
          })
          .collect(),
      });

    Ok(Some(TransactionDetail::new(transaction, user, order)))
  }

  async fn update_order_status(&self, transaction_id: Uuid, status: OrderStatus) -> StoreResult<Option<Order>> {
    let mut tables = self.tables.lock();
    Ok(
      tables
        .orders
        .values_mut()
        .find(|o| o.transaction_id == transaction_id)
        .map(|order| {
          order.status = status;
          order.clone()
        }),
    )
  }

  async fn list_users(&self, page: PageRequest) -> StoreResult<Page<User>> {
    let tables = self.tables.lock();
    let mut rows: Vec<&User> = tables.users.values().collect();
    rows.sort_by(|a, b| a.email.cmp(&b.email));
    Ok(paginate(rows, page))
  }

  async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    Ok(self.tables.lock().users.get(&id).cloned())
  }

  async fn update_user(&self, id: Uuid, profile: UserProfile) -> StoreResult<Option<User>> {
    let mut tables = self.tables.lock();
    Ok(tables.users.get_mut(&id).map(|user| {
      user.name = Some(profile.name);
      user.address = Some(profile.address);
      if profile.image.is_some() {
        user.image = profile.image;
      }
      user.clone()
    }))
  }

  async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
    let tables = self.tables.lock();
    let session = tables
      .sessions
      .get(token)
      .and_then(|user_id| tables.users.get(user_id))
      .map(|user| Session {
        token: token.to_string(),
        user: SessionUser {
          id: user.id,
          role: user.role.clone(),
          name: user.name.clone(),
          email: user.email.clone(),
        },
      });
    Ok(session)
  }
}
