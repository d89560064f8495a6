// src/web/handlers/user_handlers.rs

use actix_multipart::Multipart;
use actix_web::http::Method;
use actix_web::web;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::upload::UploadOptions;
use crate::state::AppState;
use crate::store::fetch;
use crate::validation::user::{validate_user, UserForm, UserSubmission};
use crate::web::envelope::{respond, Envelope, Reply};
use crate::web::extractors::{CurrentSession, PageQuery};
use crate::web::forms::read_form;

const USER_FOLDER: &str = "users";

#[instrument(name = "handler::list_users", skip(app_state))]
pub async fn list_users_handler(app_state: web::Data<AppState>, query: web::Query<PageQuery>) -> Envelope {
  respond(Method::GET, async move {
    let page = app_state.store.list_users(query.page_request()).await?;
    info!(count = page.items.len(), total = page.meta.total_count, "Users fetched.");
    Reply::page("Successfully get users", page)
  })
  .await
}

#[instrument(name = "handler::get_user", skip(app_state))]
pub async fn get_user_handler(app_state: web::Data<AppState>, path: web::Path<Uuid>) -> Envelope {
  let user_id = path.into_inner();
  respond(Method::GET, async move {
    let user = fetch(app_state.store.get_user(user_id)).await.found_or(|| {
      AppError::not_found(
        "Failed to get user, data not found",
        "The user you are trying to retrieve does not exist",
      )
    })?;
    Reply::ok("Successfully get user", user)
  })
  .await
}

/// Updates the signed-in user's own profile.
#[instrument(name = "handler::update_current_user", skip_all, fields(user_id = %session.0.user.id))]
pub async fn update_current_user_handler(
  app_state: web::Data<AppState>,
  session: CurrentSession,
  payload: Multipart,
) -> Envelope {
  respond(Method::PUT, async move {
    let mut form = read_form(payload).await?;
    let UserSubmission { mut profile, image } = validate_user(UserForm {
      name: form.text("name"),
      address: form.text("address"),
      image: form.file("image"),
    })
    .map_err(|fields| AppError::invalid("Failed to update user data, please check your input", fields))?;

    if let Some(image) = image {
      profile.image = Some(app_state.uploader.upload(image, UploadOptions::folder(USER_FOLDER)).await?);
    }

    let user = fetch(app_state.store.update_user(session.0.user.id, profile))
      .await
      .found_or(|| {
        AppError::not_found(
          "Failed to update user data, data not found",
          "The user you are trying to update does not exist",
        )
      })?;
    info!("User profile updated.");
    Reply::ok("Successfully update user data", user)
  })
  .await
}
