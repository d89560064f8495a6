// src/validation/mod.rs

//! Per-entity input checks. Every validator returns the normalized value or a map of
//! field name to messages; none of them touch the datastore.

pub mod cart;
pub mod category;
pub mod product;
pub mod transaction;
pub mod user;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::upload::ImageFile;

pub const REQUIRED: &str = "Required";

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const IMAGE_TOO_LARGE: &str = "Max image size is 2 MB";
pub const IMAGE_WRONG_TYPE: &str = "Only .jpg, .jpeg, .png, and .webp formats are supported";

/// Field name to messages, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

pub(crate) fn required<T>(errors: &mut FieldErrors, field: &str, value: Option<T>, missing: &str) -> Option<T> {
  if value.is_none() {
    errors.add(field, missing);
  }
  value
}

pub(crate) fn char_count(value: &str) -> usize {
  value.chars().count()
}

/// Drops zero-byte parts, then checks size and MIME type. An empty MIME type is accepted.
pub(crate) fn check_image(errors: &mut FieldErrors, field: &str, image: Option<ImageFile>) -> Option<ImageFile> {
  let image = image.filter(|image| !image.is_empty())?;
  let mut valid = true;
  if image.bytes.len() > MAX_IMAGE_BYTES {
    errors.add(field, IMAGE_TOO_LARGE);
    valid = false;
  }
  if !image.content_type.is_empty() && !ACCEPTED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
    errors.add(field, IMAGE_WRONG_TYPE);
    valid = false;
  }
  valid.then_some(image)
}
