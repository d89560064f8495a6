// src/validation/product.rs
use super::{char_count, check_image, required, FieldErrors, REQUIRED};
use crate::models::ProductDraft;
use crate::services::upload::ImageFile;

pub const NAME_TOO_SHORT: &str = "Product name must be at least 10 characters long";
pub const NAME_TOO_LONG: &str = "Product name cannot be more than 50 characters long";
pub const DESCRIPTION_TOO_SHORT: &str = "Product description must be at least 10 characters long";
pub const PRICE_REQUIRED: &str = "Price is required";
pub const CATEGORY_REQUIRED: &str = "Category is required";
pub const CATEGORY_INVALID: &str = "Category must be a valid identifier";
pub const CATEGORY_MISSING: &str = "Category does not exist";

/// Raw multipart fields of a product form.
#[derive(Debug, Default)]
pub struct ProductForm {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<String>,
  pub category_id: Option<String>,
  pub image: Option<ImageFile>,
}

#[derive(Debug)]
pub struct ProductSubmission {
  /// `draft.image` is left empty; it is filled once `image` has been uploaded.
  pub draft: ProductDraft,
  pub image: Option<ImageFile>,
}

pub fn validate_product(form: ProductForm) -> Result<ProductSubmission, FieldErrors> {
  let mut errors = FieldErrors::new();

  let name = required(&mut errors, "name", form.name, REQUIRED);
  if let Some(name) = &name {
    let len = char_count(name);
    if len < 10 {
      errors.add("name", NAME_TOO_SHORT);
    } else if len > 50 {
      errors.add("name", NAME_TOO_LONG);
    }
  }

  let description = required(&mut errors, "description", form.description, REQUIRED);
  if let Some(description) = &description {
    if char_count(description) < 10 {
      errors.add("description", DESCRIPTION_TOO_SHORT);
    }
  }

  let price = required(&mut errors, "price", form.price, PRICE_REQUIRED);

  let category_id = required(&mut errors, "category_id", form.category_id, CATEGORY_REQUIRED).and_then(|raw| {
    let parsed = raw.trim().parse::<i32>().ok();
    if parsed.is_none() {
      errors.add("category_id", CATEGORY_INVALID);
    }
    parsed
  });

  let image = check_image(&mut errors, "image", form.image);

  match (name, description, price, category_id) {
    (Some(name), Some(description), Some(price), Some(category_id)) if errors.is_empty() => Ok(ProductSubmission {
      draft: ProductDraft {
        name,
        description,
        price,
        category_id,
        image: None,
      },
      image,
    }),
    _ => Err(errors),
  }
}
