// src/web/handlers/cart_handlers.rs

use actix_web::http::Method;
use actix_web::web;
use tracing::{info, instrument, warn};

use storefront_core::{ContextData, PipelineResult};

use crate::errors::AppError;
use crate::models::{Cart, CartView};
use crate::pipelines::contexts::AddToCartCtxData;
use crate::state::AppState;
use crate::store::fetch;
use crate::validation::cart::{validate_new_item, validate_quantity, CartItemInput};
use crate::web::envelope::{respond, Envelope, Reply};
use crate::web::extractors::CurrentSession;

fn item_not_found(action: &str) -> AppError {
  AppError::not_found(
    format!("Failed to {} item, data not found", action),
    format!("The item you are trying to {} does not exist", action),
  )
}

/// The caller's cart; a user without a cart has no items to address.
async fn own_cart(app_state: &AppState, session: &CurrentSession, action: &str) -> Result<Cart, AppError> {
  fetch(app_state.store.find_cart_for_user(session.0.user.id))
    .await
    .found_or(|| item_not_found(action))
}

#[instrument(name = "handler::get_cart", skip_all, fields(user_id = %session.0.user.id))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, session: CurrentSession) -> Envelope {
  respond(Method::GET, async move {
    let cart = app_state.store.upsert_cart(session.0.user.id).await?;
    let items = app_state.store.list_cart_items(cart.id).await?;
    info!(cart_id = cart.id, items = items.len(), "Cart fetched.");
    Reply::ok("Successfully get cart", CartView::new(cart, items))
  })
  .await
}

#[instrument(
  name = "handler::add_to_cart",
  skip_all,
  fields(user_id = %session.0.user.id, product_id = ?body.product_id, quantity = ?body.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  session: CurrentSession,
  body: web::Json<CartItemInput>,
) -> Envelope {
  respond(Method::POST, async move {
    let item = validate_new_item(body.into_inner())
      .map_err(|fields| AppError::invalid("Failed to add item to cart, please check your input", fields))?;

    let ctx = ContextData::new(AddToCartCtxData::new(
      app_state.store.clone(),
      session.0.user.id,
      item.product_id,
      item.quantity,
    ));

    match app_state.flows.run(ctx.clone()).await? {
      PipelineResult::Completed => {}
      PipelineResult::Stopped => {
        warn!("Add to Cart pipeline was stopped by a handler.");
        return Err(AppError::Internal("Process to add item to cart was halted.".to_string()));
      }
    }

    let (cart_item, created) = {
      let guard = ctx.read();
      (guard.cart_item.clone(), guard.created)
    };
    let cart_item = cart_item
      .ok_or_else(|| AppError::Internal("Cart update completed, but item details are unavailable.".to_string()))?;

    if created {
      Reply::created("Successfully added item to cart", cart_item)
    } else {
      Reply::ok("Successfully updated item in cart", cart_item)
    }
  })
  .await
}

#[instrument(name = "handler::get_cart_item", skip_all, fields(user_id = %session.0.user.id))]
pub async fn get_cart_item_handler(
  app_state: web::Data<AppState>,
  session: CurrentSession,
  path: web::Path<i32>,
) -> Envelope {
  let item_id = path.into_inner();
  respond(Method::GET, async move {
    let cart = own_cart(&app_state, &session, "get").await?;
    let item = fetch(app_state.store.get_cart_item(cart.id, item_id))
      .await
      .found_or(|| item_not_found("get"))?;
    Reply::ok("Successfully get item", item)
  })
  .await
}

#[instrument(name = "handler::update_cart_item", skip_all, fields(user_id = %session.0.user.id))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  session: CurrentSession,
  path: web::Path<i32>,
  body: web::Json<CartItemInput>,
) -> Envelope {
  let item_id = path.into_inner();
  respond(Method::PUT, async move {
    let quantity = validate_quantity(body.into_inner())
      .map_err(|fields| AppError::invalid("Failed to update item, please check your input", fields))?;
    let cart = own_cart(&app_state, &session, "update").await?;
    let item = fetch(app_state.store.update_cart_item(cart.id, item_id, quantity))
      .await
      .found_or(|| item_not_found("update"))?;
    info!(item_id, quantity, "Cart item updated.");
    Reply::ok("Successfully update item", item)
  })
  .await
}

#[instrument(name = "handler::delete_cart_item", skip_all, fields(user_id = %session.0.user.id))]
pub async fn delete_cart_item_handler(
  app_state: web::Data<AppState>,
  session: CurrentSession,
  path: web::Path<i32>,
) -> Envelope {
  let item_id = path.into_inner();
  respond(Method::DELETE, async move {
    let cart = own_cart(&app_state, &session, "delete").await?;
    let item = fetch(app_state.store.delete_cart_item(cart.id, item_id))
      .await
      .found_or(|| item_not_found("delete"))?;
    info!(item_id, "Cart item deleted.");
    Reply::ok("Successfully deleted item from cart", item)
  })
  .await
}
