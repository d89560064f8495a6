// src/web/forms.rs

//! Multipart form reading for the product and user endpoints.

use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::collections::HashMap;
use tracing::warn;

use crate::errors::AppError;
use crate::services::upload::ImageFile;
use crate::validation::MAX_IMAGE_BYTES;

/// Text fields and file parts of one multipart body. Zero-byte file parts are dropped.
#[derive(Debug, Default)]
pub struct FormData {
  fields: HashMap<String, String>,
  files: HashMap<String, ImageFile>,
}

impl FormData {
  pub fn text(&mut self, name: &str) -> Option<String> {
    self.fields.remove(name)
  }

  pub fn file(&mut self, name: &str) -> Option<ImageFile> {
    self.files.remove(name)
  }
}

/// Longest text field accepted.
pub const MAX_TEXT_BYTES: usize = 64 * 1024;
/// Most parts read from one body.
pub const MAX_PARTS: usize = 16;

fn malformed(e: impl std::fmt::Display) -> AppError {
  AppError::BadRequest(format!("Malformed multipart body: {}", e))
}

/// Keeps at most `limit + 1` bytes of a part and discards the rest, so an oversized image
/// still reaches validation as "too large" without being held in full.
fn append_capped(bytes: &mut Vec<u8>, chunk: &[u8], limit: usize) {
  let room = (limit + 1).saturating_sub(bytes.len());
  bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
}

pub async fn read_form(mut payload: Multipart) -> Result<FormData, AppError> {
  let mut form = FormData::default();
  let mut parts = 0;

  while let Some(field) = payload.next().await {
    let mut field = field.map_err(malformed)?;
    parts += 1;
    if parts > MAX_PARTS {
      return Err(AppError::BadRequest(format!("Too many form fields, at most {} are accepted", MAX_PARTS)));
    }
    let Some(name) = field.name().map(str::to_owned) else {
      continue;
    };
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_owned);
    let content_type = field
      .content_type()
      .map(|mime| mime.essence_str().to_owned())
      .unwrap_or_default();

    let limit = if file_name.is_some() { MAX_IMAGE_BYTES } else { MAX_TEXT_BYTES };
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
      append_capped(&mut bytes, &chunk.map_err(malformed)?, limit);
    }

    match file_name {
      Some(file_name) => {
        if bytes.len() > MAX_IMAGE_BYTES {
          warn!(field = %name, "Image part exceeds the size limit, remainder discarded.");
        }
        if !bytes.is_empty() {
          form.files.insert(
            name,
            ImageFile {
              file_name,
              content_type,
              bytes,
            },
          );
        }
      }
      None => {
        if bytes.len() > MAX_TEXT_BYTES {
          return Err(AppError::BadRequest(format!(
            "Field `{}` is longer than {} bytes",
            name, MAX_TEXT_BYTES
          )));
        }
        let value = String::from_utf8(bytes).map_err(malformed)?;
        form.fields.insert(name, value);
      }
    }
  }

  Ok(form)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn capped_buffer_stops_one_byte_past_the_limit() {
    let mut bytes = Vec::new();
    append_capped(&mut bytes, &[1; 6], 8);
    append_capped(&mut bytes, &[2; 6], 8);
    append_capped(&mut bytes, &[3; 6], 8);
    assert_eq!(bytes.len(), 9);
    assert_eq!(&bytes[6..], &[2, 2, 2]);
  }
}
