// src/pipelines/checkout_pipeline.rs

//! Checkout: the cart must belong to the caller and hold at least one line; the transaction,
//! its order, the order lines and the emptied cart are committed as one datastore transaction.

use storefront_core::{ContextData, FlowError, FlowRegistry, Pipeline, PipelineControl, StepDef};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{Cart, CheckoutLine, NewCheckout};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::store::fetch;
use crate::validation::FieldErrors;

pub const CHECKOUT_FAILED: &str = "Transaction failed, please check your input";
pub const CART_EMPTY: &str = "Cart is empty";

pub fn register_checkout_pipeline(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new([
    StepDef::required("load_cart"),
    StepDef::required("collect_cart_lines"),
    StepDef::required("commit_checkout"),
  ]);

  p.on_step("load_cart", load_cart)?;
  p.on_step("collect_cart_lines", collect_cart_lines)?;
  p.on_step("commit_checkout", commit_checkout)?;

  registry.register(p);
  Ok(())
}

fn cart_not_found() -> AppError {
  AppError::not_found(
    "Transaction failed, cart not found",
    "The cart you are trying to check out does not exist",
  )
}

#[instrument(name = "checkout::load_cart", skip_all)]
async fn load_cart(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (store, cart_id, user_id) = {
    let guard = ctx.read();
    (guard.store.clone(), guard.cart_id, guard.user_id)
  };

  let cart = fetch(store.find_cart(cart_id)).await.found_or(cart_not_found)?;
  // Someone else's cart is reported exactly like a missing one.
  if cart.user_id != user_id {
    warn!(cart_id, %user_id, "Checkout attempted on a cart owned by another user.");
    return Err(cart_not_found());
  }

  ctx.write().cart = Some(cart);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::collect_cart_lines", skip_all)]
async fn collect_cart_lines(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (store, cart_id) = {
    let guard = ctx.read();
    (guard.store.clone(), loaded_cart_id(&guard.cart)?)
  };

  let items = store.list_cart_items(cart_id).await?;
  if items.is_empty() {
    return Err(AppError::invalid(CHECKOUT_FAILED, FieldErrors::single("cart_id", CART_EMPTY)));
  }

  let lines = items
    .into_iter()
    .map(|item| CheckoutLine {
      cart_item_id: item.id,
      product_id: item.product_id,
      quantity: item.quantity,
      price: item.product.price,
    })
    .collect::<Vec<_>>();
  info!(cart_id, lines = lines.len(), "Cart lines collected.");
  ctx.write().lines = lines;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::commit_checkout", skip_all)]
async fn commit_checkout(ctx: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (store, checkout) = {
    let guard = ctx.read();
    (
      guard.store.clone(),
      NewCheckout {
        user_id: guard.user_id,
        cart_id: loaded_cart_id(&guard.cart)?,
        amount: guard.amount,
        lines: guard.lines.clone(),
      },
    )
  };

  let receipt = store.commit_checkout(checkout).await?;
  info!(transaction_id = %receipt.transaction.id, order_id = receipt.order.id, "Checkout completed.");
  ctx.write().receipt = Some(receipt);
  Ok(PipelineControl::Continue)
}

fn loaded_cart_id(cart: &Option<Cart>) -> Result<i32, AppError> {
  cart
    .as_ref()
    .map(|cart| cart.id)
    .ok_or_else(|| AppError::Internal("cart was not loaded before use".to_string()))
}
