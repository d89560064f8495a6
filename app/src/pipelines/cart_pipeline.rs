// src/pipelines/cart_pipeline.rs

//! Add-to-cart: the product must exist, the caller's cart is created on demand, and a
//! product already in the cart has its quantity overwritten rather than incremented.

use storefront_core::{ContextData, FlowError, FlowRegistry, Pipeline, PipelineControl, StepDef};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use crate::store::fetch;

pub fn register_add_to_cart_pipeline(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new([
    StepDef::required("load_product"),
    StepDef::required("upsert_cart"),
    StepDef::required("find_existing_item"),
    StepDef::required("write_cart_item"),
  ]);

  p.on_step("load_product", load_product)?;
  p.on_step("upsert_cart", upsert_cart)?;
  p.on_step("find_existing_item", find_existing_item)?;
  p.on_step("write_cart_item", write_cart_item)?;

  registry.register(p);
  Ok(())
}

#[instrument(name = "add_to_cart::load_product", skip_all)]
async fn load_product(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (store, product_id) = {
    let guard = ctx.read();
    (guard.store.clone(), guard.product_id)
  };

  fetch(store.get_product(product_id)).await.found_or(|| {
    AppError::not_found(
      "Failed to add item to cart, product not found",
      "The product you are trying to add does not exist",
    )
  })?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "add_to_cart::upsert_cart", skip_all)]
async fn upsert_cart(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (store, user_id) = {
    let guard = ctx.read();
    (guard.store.clone(), guard.user_id)
  };

  let cart = store.upsert_cart(user_id).await?;
  info!(cart_id = cart.id, %user_id, "Cart ready.");
  ctx.write().cart = Some(cart);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "add_to_cart::find_existing_item", skip_all)]
async fn find_existing_item(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (store, cart_id, product_id) = {
    let guard = ctx.read();
    (guard.store.clone(), cart_id_of(&guard.cart)?, guard.product_id)
  };

  let existing = store.find_cart_item(cart_id, product_id).await?;
  ctx.write().existing_item = existing;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "add_to_cart::write_cart_item", skip_all)]
async fn write_cart_item(ctx: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (store, cart_id, product_id, quantity, existing) = {
    let guard = ctx.read();
    (
      guard.store.clone(),
      cart_id_of(&guard.cart)?,
      guard.product_id,
      guard.quantity,
      guard.existing_item.clone(),
    )
  };

  let (item, created) = match existing {
    Some(existing) => {
      let item = fetch(store.update_cart_item(cart_id, existing.id, quantity))
        .await
        .found_or(|| {
          AppError::not_found(
            "Failed to update item, data not found",
            "The item you are trying to update does not exist",
          )
        })?;
      (item, false)
    }
    None => (store.create_cart_item(cart_id, product_id, quantity).await?, true),
  };

  info!(item_id = item.id, quantity = item.quantity, created, "Cart item written.");
  {
    let mut guard = ctx.write();
    guard.cart_item = Some(item);
    guard.created = created;
  }
  Ok(PipelineControl::Continue)
}

fn cart_id_of(cart: &Option<crate::models::Cart>) -> Result<i32, AppError> {
  cart
    .as_ref()
    .map(|cart| cart.id)
    .ok_or_else(|| AppError::Internal("cart was not loaded before use".to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{NewCategory, ProductDraft};
  use crate::store::{MemoryStore, Store};
  use std::sync::Arc;
  use uuid::Uuid;

  async fn registry_and_product() -> (FlowRegistry<AppError>, Arc<MemoryStore>, i32) {
    let store = Arc::new(MemoryStore::new());
    let category = store
      .create_category(NewCategory {
        name: "Games".to_string(),
      })
      .await
      .unwrap();
    let product = store
      .create_product(ProductDraft {
        name: "Chess set, walnut".to_string(),
        description: "Weighted pieces and a folding board".to_string(),
        price: "59.00".to_string(),
        category_id: category.id,
        image: None,
      })
      .await
      .unwrap();

    let registry = FlowRegistry::new();
    register_add_to_cart_pipeline(&registry).unwrap();
    (registry, store, product.id)
  }

  #[actix_web::test]
  async fn second_add_overwrites_the_quantity() {
    let (registry, store, product_id) = registry_and_product().await;
    let user_id = Uuid::new_v4();

    let first = ContextData::new(AddToCartCtxData::new(store.clone(), user_id, product_id, 2));
    registry.run(first.clone()).await.unwrap();
    assert!(first.read().created);

    let second = ContextData::new(AddToCartCtxData::new(store.clone(), user_id, product_id, 5));
    registry.run(second.clone()).await.unwrap();
    assert!(!second.read().created);

    let cart = store.find_cart_for_user(user_id).await.unwrap().unwrap();
    let items = store.list_cart_items(cart.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
  }

  #[actix_web::test]
  async fn unknown_product_is_not_found_and_creates_no_cart() {
    let (registry, store, _) = registry_and_product().await;
    let user_id = Uuid::new_v4();

    let ctx = ContextData::new(AddToCartCtxData::new(store.clone(), user_id, 404, 1));
    let result = registry.run(ctx).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
    assert!(store.find_cart_for_user(user_id).await.unwrap().is_none());
  }
}
