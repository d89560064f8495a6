// src/web/extractors.rs

//! Request extractors, and the error handlers that keep actix's own extractor failures
//! inside the response envelope.

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{PageRequest, Session};

/// The session attached by `AccessControl`. Only usable on routes that require one.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequest for CurrentSession {
  type Error = actix_web::Error;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let result = match req.extensions().get::<Session>().cloned() {
      Some(session) => Ok(CurrentSession(session)),
      None => {
        tracing::warn!(path = %req.path(), "Handler expected a session but none was attached.");
        Err(envelope_error(AppError::Unauthorized, req))
      }
    };
    ready(result)
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
  pub page: Option<i64>,
}

impl PageQuery {
  pub fn page_request(&self) -> PageRequest {
    PageRequest::new(self.page)
  }
}

fn envelope_error(error: AppError, req: &HttpRequest) -> actix_web::Error {
  let detail = error.to_string();
  let response = error.into_envelope(req.method()).into_response();
  InternalError::from_response(detail, response).into()
}

/// Malformed JSON bodies answer 400.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, req| envelope_error(AppError::BadRequest(err.to_string()), req))
}

/// Unparseable path identifiers answer 404; no row can match them.
pub fn path_config() -> web::PathConfig {
  web::PathConfig::default().error_handler(|err, req| {
    envelope_error(
      AppError::not_found("Failed to process request, data not found", err.to_string()),
      req,
    )
  })
}

pub fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, req| envelope_error(AppError::BadRequest(err.to_string()), req))
}
