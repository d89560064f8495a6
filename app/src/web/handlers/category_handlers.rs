// src/web/handlers/category_handlers.rs

use actix_web::http::Method;
use actix_web::web;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::fetch;
use crate::validation::category::{validate_category, CategoryInput};
use crate::web::envelope::{respond, Envelope, Reply};
use crate::web::extractors::PageQuery;

fn category_not_found(action: &str) -> AppError {
  AppError::not_found(
    format!("Failed to {} category, data not found", action),
    format!("The category you are trying to {} does not exist", action),
  )
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>, query: web::Query<PageQuery>) -> Envelope {
  respond(Method::GET, async move {
    let page = app_state.store.list_categories(query.page_request()).await?;
    info!(count = page.items.len(), total = page.meta.total_count, "Categories fetched.");
    Reply::page("Successfully get categories", page)
  })
  .await
}

#[instrument(name = "handler::get_category", skip(app_state))]
pub async fn get_category_handler(app_state: web::Data<AppState>, path: web::Path<i32>) -> Envelope {
  let category_id = path.into_inner();
  respond(Method::GET, async move {
    let category = fetch(app_state.store.get_category(category_id))
      .await
      .found_or(|| category_not_found("get"))?;
    Reply::ok("Successfully get category", category)
  })
  .await
}

#[instrument(name = "handler::create_category", skip(app_state, body))]
pub async fn create_category_handler(app_state: web::Data<AppState>, body: web::Json<CategoryInput>) -> Envelope {
  respond(Method::POST, async move {
    let category = validate_category(body.into_inner())
      .map_err(|fields| AppError::invalid("Failed to create category, please check your input", fields))?;
    let created = app_state.store.create_category(category).await?;
    info!(category_id = created.id, "Category created.");
    Reply::created("Category successfully created.", created)
  })
  .await
}

#[instrument(name = "handler::update_category", skip(app_state, body))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  body: web::Json<CategoryInput>,
) -> Envelope {
  let category_id = path.into_inner();
  respond(Method::PUT, async move {
    let category = validate_category(body.into_inner())
      .map_err(|fields| AppError::invalid("Failed to update category, please check your input", fields))?;
    let updated = fetch(app_state.store.update_category(category_id, category))
      .await
      .found_or(|| category_not_found("update"))?;
    info!(category_id, "Category updated.");
    Reply::ok("Successfully updated category", updated)
  })
  .await
}

#[instrument(name = "handler::delete_category", skip(app_state))]
pub async fn delete_category_handler(app_state: web::Data<AppState>, path: web::Path<i32>) -> Envelope {
  let category_id = path.into_inner();
  respond(Method::DELETE, async move {
    let deleted = fetch(app_state.store.delete_category(category_id))
      .await
      .found_or(|| category_not_found("delete"))?;
    info!(category_id, "Category deleted.");
    Reply::ok("Successfully deleted category", deleted)
  })
  .await
}
