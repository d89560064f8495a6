// src/web/access.rs

//! Per-route access policy. Each route declares an [`Access`] level and is wrapped in
//! [`AccessControl`], which resolves the bearer session and rejects the request with a
//! 401 envelope before the handler runs.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::Session;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Public,
  /// Any signed-in user.
  Authenticated,
  /// Signed-in user whose role is `admin`.
  Admin,
}

/// `true` when the request must be refused: no session at all, or an admin-only route
/// reached by a non-admin.
pub fn access_denied(session: Option<&Session>, require_admin: bool) -> bool {
  match session {
    None => true,
    Some(session) => require_admin && !session.is_admin(),
  }
}

/// The token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &ServiceRequest) -> Option<String> {
  let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

pub struct AccessControl {
  access: Access,
}

impl AccessControl {
  pub fn new(access: Access) -> Self {
    Self { access }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AccessControlService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AccessControlService {
      service: Rc::new(service),
      access: self.access,
    }))
  }
}

pub struct AccessControlService<S> {
  service: Rc<S>,
  access: Access,
}

impl<S, B> Service<ServiceRequest> for AccessControlService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let access = self.access;

    Box::pin(async move {
      if access == Access::Public {
        return service.call(req).await.map(ServiceResponse::map_into_left_body);
      }

      let session = match resolve_session(&req).await {
        Ok(session) => session,
        Err(e) => {
          let response = e.into_envelope(req.method()).into_response();
          return Ok(req.into_response(response).map_into_right_body());
        }
      };

      if access_denied(session.as_ref(), access == Access::Admin) {
        warn!(method = %req.method(), path = %req.path(), ?access, "Access denied.");
        let response = AppError::Unauthorized.into_envelope(req.method()).into_response();
        return Ok(req.into_response(response).map_into_right_body());
      }

      if let Some(session) = session {
        debug!(user_id = %session.user.id, role = %session.user.role, "Session attached.");
        req.extensions_mut().insert(session);
      }
      service.call(req).await.map(ServiceResponse::map_into_left_body)
    })
  }
}

async fn resolve_session(req: &ServiceRequest) -> Result<Option<Session>, AppError> {
  let Some(token) = bearer_token(req) else {
    return Ok(None);
  };
  let sessions = req
    .app_data::<web::Data<AppState>>()
    .map(|state| state.sessions.clone())
    .ok_or_else(|| AppError::Internal("application state is not configured".to_string()))?;
  Ok(sessions.session_for(&token).await?)
}
