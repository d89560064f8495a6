// src/web/mod.rs

pub mod access;
pub mod envelope;
pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod routes;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web as actix_data, App, Error};

use crate::state::AppState;

pub use routes::configure_app_routes;

/// The application with state, extractor error handlers and routes. `main` adds the
/// request logger; tests use it as is.
pub fn build_app(
  app_state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = Error,
    InitError = (),
  >,
> {
  App::new()
    .app_data(actix_data::Data::new(app_state))
    .app_data(extractors::json_config())
    .app_data(extractors::path_config())
    .app_data(extractors::query_config())
    .configure(configure_app_routes)
    .default_service(actix_data::to(routes::not_found_handler))
}
