// src/models/mod.rs

//! Data structures representing database entities and the shapes handlers return.

pub mod cart;
pub mod category;
pub mod order;
pub mod page;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartItemDetail, CartView, ProductSummary};
pub use category::{Category, NewCategory};
pub use order::{
  CheckoutLine, CheckoutReceipt, NewCheckout, Order, OrderDetail, OrderItem, OrderItemDetail, OrderStatus,
  Transaction, TransactionDetail,
};
pub use page::{Page, PageMeta, PageRequest, PAGE_SIZE};
pub use product::{Product, ProductDraft, ProductFilter};
pub use session::{Session, SessionUser};
pub use user::{User, UserContact, UserProfile};
