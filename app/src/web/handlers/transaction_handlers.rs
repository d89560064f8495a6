// src/web/handlers/transaction_handlers.rs

use actix_web::http::Method;
use actix_web::web;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use storefront_core::{ContextData, PipelineResult};

use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::store::fetch;
use crate::validation::transaction::{validate_checkout, validate_order_status, CheckoutInput, OrderStatusInput};
use crate::web::envelope::{respond, Envelope, Reply};
use crate::web::extractors::CurrentSession;

fn transaction_not_found(action: &str) -> AppError {
  AppError::not_found(
    format!("Failed to {} transaction, data not found", action),
    format!("The transaction you are trying to {} does not exist", action),
  )
}

#[instrument(name = "handler::checkout", skip_all, fields(user_id = %session.0.user.id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  session: CurrentSession,
  body: web::Json<CheckoutInput>,
) -> Envelope {
  respond(Method::POST, async move {
    let request = validate_checkout(body.into_inner())
      .map_err(|fields| AppError::invalid("Transaction failed, please check your input", fields))?;

    let ctx = ContextData::new(CheckoutCtxData::new(
      app_state.store.clone(),
      session.0.user.id,
      request.cart_id,
      request.amount,
    ));

    match app_state.flows.run(ctx.clone()).await? {
      PipelineResult::Completed => {}
      PipelineResult::Stopped => {
        warn!(cart_id = request.cart_id, "Checkout pipeline was stopped by a handler.");
        return Err(AppError::Internal("Checkout was halted before completion.".to_string()));
      }
    }

    let receipt = ctx.read().receipt.clone();
    let receipt =
      receipt.ok_or_else(|| AppError::Internal("Checkout completed, but no receipt was recorded.".to_string()))?;
    info!(transaction_id = %receipt.transaction.id, "Transaction created.");
    Reply::created("Transaction successful", receipt)
  })
  .await
}

#[instrument(name = "handler::get_transaction", skip(app_state))]
pub async fn get_transaction_handler(app_state: web::Data<AppState>, path: web::Path<Uuid>) -> Envelope {
  let transaction_id = path.into_inner();
  respond(Method::GET, async move {
    let transaction = fetch(app_state.store.get_transaction(transaction_id))
      .await
      .found_or(|| transaction_not_found("get"))?;
    Reply::ok("Successfully get transaction", transaction)
  })
  .await
}

#[instrument(name = "handler::update_transaction", skip(app_state, body))]
pub async fn update_transaction_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  body: web::Json<OrderStatusInput>,
) -> Envelope {
  let transaction_id = path.into_inner();
  respond(Method::PUT, async move {
    let status = validate_order_status(body.into_inner())
      .map_err(|fields| AppError::invalid("Failed to update transaction, please check your input", fields))?;
    let order = fetch(app_state.store.update_order_status(transaction_id, status))
      .await
      .found_or(|| transaction_not_found("update"))?;
    info!(%transaction_id, %status, "Order status updated.");
    Reply::ok("Successfully update transaction", order)
  })
  .await
}
