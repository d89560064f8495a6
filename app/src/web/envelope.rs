// src/web/envelope.rs

//! The single JSON body shape every endpoint answers with:
//! `{message, method, meta?, data, error}`.

use actix_web::body::BoxBody;
use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

use crate::errors::AppError;
use crate::models::{Page, PageMeta};

#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeBody {
  pub message: String,
  pub method: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub meta: Option<PageMeta>,
  pub data: Value,
  pub error: Value,
}

#[derive(Debug, Clone)]
pub struct Envelope {
  status: StatusCode,
  body: EnvelopeBody,
}

impl Envelope {
  pub fn failure(status: StatusCode, message: impl Into<String>, method: &Method, error: Value) -> Self {
    Self {
      status,
      body: EnvelopeBody {
        message: message.into(),
        method: method.as_str().to_string(),
        meta: None,
        data: Value::Null,
        error,
      },
    }
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }

  pub fn body(&self) -> &EnvelopeBody {
    &self.body
  }

  pub fn into_response(self) -> HttpResponse {
    HttpResponse::build(self.status).json(self.body)
  }
}

impl Responder for Envelope {
  type Body = BoxBody;

  fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
    self.into_response()
  }
}

/// A successful outcome, turned into an [`Envelope`] by [`respond`].
#[derive(Debug)]
pub struct Reply {
  status: StatusCode,
  message: String,
  data: Value,
  meta: Option<PageMeta>,
}

impl Reply {
  pub fn ok(message: impl Into<String>, data: impl Serialize) -> Result<Self, AppError> {
    Self::with_status(StatusCode::OK, message, data)
  }

  pub fn created(message: impl Into<String>, data: impl Serialize) -> Result<Self, AppError> {
    Self::with_status(StatusCode::CREATED, message, data)
  }

  pub fn with_status(status: StatusCode, message: impl Into<String>, data: impl Serialize) -> Result<Self, AppError> {
    Ok(Self {
      status,
      message: message.into(),
      data: serde_json::to_value(data)?,
      meta: None,
    })
  }

  /// A list reply carrying pagination meta.
  pub fn page<T: Serialize>(message: impl Into<String>, page: Page<T>) -> Result<Self, AppError> {
    let mut reply = Self::ok(message, page.items)?;
    reply.meta = Some(page.meta);
    Ok(reply)
  }

  fn into_envelope(self, method: &Method) -> Envelope {
    Envelope {
      status: self.status,
      body: EnvelopeBody {
        message: self.message,
        method: method.as_str().to_string(),
        meta: self.meta,
        data: self.data,
        error: Value::Null,
      },
    }
  }
}

/// Runs a handler body and wraps whatever it yields, success or error, in the envelope.
pub async fn respond<F>(method: Method, work: F) -> Envelope
where
  F: Future<Output = Result<Reply, AppError>>,
{
  match work.await {
    Ok(reply) => reply.into_envelope(&method),
    Err(e) => e.into_envelope(&method),
  }
}
