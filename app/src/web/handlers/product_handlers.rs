// src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::http::Method;
use actix_web::web;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::ProductFilter;
use crate::services::upload::UploadOptions;
use crate::state::AppState;
use crate::store::{fetch, Fetched};
use crate::validation::product::{validate_product, ProductForm, ProductSubmission, CATEGORY_MISSING};
use crate::validation::FieldErrors;
use crate::web::envelope::{respond, Envelope, Reply};
use crate::web::forms::read_form;

const PRODUCT_FOLDER: &str = "products";

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub page: Option<i64>,
  pub category_id: Option<i32>,
}

fn product_not_found(action: &str) -> AppError {
  AppError::not_found(
    format!("Failed to {} product, data not found", action),
    format!("The product you are trying to {} does not exist", action),
  )
}

/// Reads and validates the form, then checks the referenced category exists.
async fn read_submission(app_state: &AppState, payload: Multipart, failure: &str) -> Result<ProductSubmission, AppError> {
  let mut form = read_form(payload).await?;
  let submission = validate_product(ProductForm {
    name: form.text("name"),
    description: form.text("description"),
    price: form.text("price"),
    category_id: form.text("category_id"),
    image: form.file("image"),
  })
  .map_err(|fields| AppError::invalid(failure, fields))?;

  match fetch(app_state.store.get_category(submission.draft.category_id)).await {
    Fetched::Found(_) => Ok(submission),
    Fetched::Missing => Err(AppError::invalid(
      failure,
      FieldErrors::single("category_id", CATEGORY_MISSING),
    )),
    Fetched::Failed(e) => Err(e.into()),
  }
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>, query: web::Query<ListProductsQuery>) -> Envelope {
  respond(Method::GET, async move {
    let query = query.into_inner();
    let filter = ProductFilter {
      category_id: query.category_id,
    };
    let page = app_state
      .store
      .list_products(filter, crate::models::PageRequest::new(query.page))
      .await?;
    info!(count = page.items.len(), total = page.meta.total_count, "Products fetched.");
    Reply::page("Successfully get products", page)
  })
  .await
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(app_state: web::Data<AppState>, path: web::Path<i32>) -> Envelope {
  let product_id = path.into_inner();
  respond(Method::GET, async move {
    let product = fetch(app_state.store.get_product(product_id))
      .await
      .found_or(|| product_not_found("get"))?;
    Reply::ok("Successfully get product", product)
  })
  .await
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(app_state: web::Data<AppState>, payload: Multipart) -> Envelope {
  respond(Method::POST, async move {
    let ProductSubmission { mut draft, image } =
      read_submission(&app_state, payload, "Failed to create product, please check your input").await?;

    if let Some(image) = image {
      draft.image = Some(app_state.uploader.upload(image, UploadOptions::folder(PRODUCT_FOLDER)).await?);
    }

    let created = app_state.store.create_product(draft).await?;
    info!(product_id = created.id, "Product created.");
    Reply::created("Product successfully created.", created)
  })
  .await
}

#[instrument(name = "handler::update_product", skip(app_state, payload))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  payload: Multipart,
) -> Envelope {
  let product_id = path.into_inner();
  respond(Method::PUT, async move {
    let ProductSubmission { mut draft, image } =
      read_submission(&app_state, payload, "Failed to update product, please check your input").await?;

    // Nothing is uploaded for a product that does not exist.
    fetch(app_state.store.get_product(product_id))
      .await
      .found_or(|| product_not_found("update"))?;

    if let Some(image) = image {
      draft.image = Some(app_state.uploader.upload(image, UploadOptions::folder(PRODUCT_FOLDER)).await?);
    }

    let updated = fetch(app_state.store.update_product(product_id, draft))
      .await
      .found_or(|| product_not_found("update"))?;
    info!(product_id, "Product updated.");
    Reply::ok("Successfully updated product", updated)
  })
  .await
}

#[instrument(name = "handler::delete_product", skip(app_state))]
pub async fn delete_product_handler(app_state: web::Data<AppState>, path: web::Path<i32>) -> Envelope {
  let product_id = path.into_inner();
  respond(Method::DELETE, async move {
    let deleted = fetch(app_state.store.delete_product(product_id))
      .await
      .found_or(|| product_not_found("delete"))?;
    info!(product_id, "Product deleted.");
    Reply::ok("Successfully deleted product", deleted)
  })
  .await
}
