// src/web/routes.rs

//! Route table. Every entry names its method, handler and [`Access`] policy in one place.

use actix_web::http::Method;
use actix_web::{web, FromRequest, Handler, HttpRequest, Responder, Route};
use serde_json::json;

use crate::errors::AppError;
use crate::web::access::{Access, AccessControl};
use crate::web::envelope::{respond, Envelope, Reply};
use crate::web::handlers::{
  cart_handlers, category_handlers, product_handlers, transaction_handlers, user_handlers,
};

async fn health_check_handler() -> Envelope {
  respond(Method::GET, async { Reply::ok("ok", json!({ "status": "ok" })) }).await
}

/// Unknown paths.
pub async fn not_found_handler(req: HttpRequest) -> Envelope {
  AppError::not_found("Route not found", format!("No route matches {}", req.path())).into_envelope(req.method())
}

/// Known path, unsupported method.
async fn method_not_allowed_handler(req: HttpRequest) -> Envelope {
  let method = req.method().clone();
  Envelope::failure(
    actix_web::http::StatusCode::METHOD_NOT_ALLOWED,
    "Method not allowed",
    &method,
    json!(format!("{} is not supported on {}", method, req.path())),
  )
}

/// A route for `method` guarded by `access`.
fn route<F, Args>(method: Method, access: Access, handler: F) -> Route
where
  F: Handler<Args>,
  Args: FromRequest + 'static,
  F::Output: Responder + 'static,
{
  web::method(method).to(handler).wrap(AccessControl::new(access))
}

fn resource(path: &str) -> actix_web::Resource {
  web::resource(path).default_service(web::to(method_not_allowed_handler))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      // Categories
      .service(
        resource("/categories")
          .route(route(Method::GET, Access::Public, category_handlers::list_categories_handler))
          .route(route(Method::POST, Access::Admin, category_handlers::create_category_handler)),
      )
      .service(
        resource("/categories/{category_id}")
          .route(route(Method::GET, Access::Public, category_handlers::get_category_handler))
          .route(route(Method::PUT, Access::Admin, category_handlers::update_category_handler))
          .route(route(Method::DELETE, Access::Admin, category_handlers::delete_category_handler)),
      )
      // Products
      .service(
        resource("/products")
          .route(route(Method::GET, Access::Public, product_handlers::list_products_handler))
          .route(route(Method::POST, Access::Admin, product_handlers::create_product_handler)),
      )
      .service(
        resource("/products/{product_id}")
          .route(route(Method::GET, Access::Public, product_handlers::get_product_handler))
          .route(route(Method::PUT, Access::Admin, product_handlers::update_product_handler))
          .route(route(Method::DELETE, Access::Admin, product_handlers::delete_product_handler)),
      )
      // Carts, always the caller's own
      .service(
        resource("/carts")
          .route(route(Method::GET, Access::Authenticated, cart_handlers::get_cart_handler))
          .route(route(Method::POST, Access::Authenticated, cart_handlers::add_to_cart_handler)),
      )
      .service(
        resource("/carts/{item_id}")
          .route(route(Method::GET, Access::Authenticated, cart_handlers::get_cart_item_handler))
          .route(route(Method::PUT, Access::Authenticated, cart_handlers::update_cart_item_handler))
          .route(route(Method::DELETE, Access::Authenticated, cart_handlers::delete_cart_item_handler)),
      )
      // Transactions
      .service(
        resource("/transactions")
          .route(route(Method::POST, Access::Authenticated, transaction_handlers::checkout_handler)),
      )
      .service(
        resource("/transactions/{transaction_id}")
          .route(route(Method::GET, Access::Admin, transaction_handlers::get_transaction_handler))
          .route(route(Method::PUT, Access::Admin, transaction_handlers::update_transaction_handler)),
      )
      // Users
      .service(
        resource("/users")
          .route(route(Method::GET, Access::Admin, user_handlers::list_users_handler))
          .route(route(Method::PUT, Access::Authenticated, user_handlers::update_current_user_handler)),
      )
      .service(
        resource("/users/{user_id}").route(route(Method::GET, Access::Admin, user_handlers::get_user_handler)),
      ),
  );
}
