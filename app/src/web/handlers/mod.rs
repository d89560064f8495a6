// src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod category_handlers;
pub mod product_handlers;
pub mod transaction_handlers;
pub mod user_handlers;
