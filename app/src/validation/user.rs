// src/validation/user.rs
use super::{check_image, required, FieldErrors, REQUIRED};
use crate::models::UserProfile;
use crate::services::upload::ImageFile;

#[derive(Debug, Default)]
pub struct UserForm {
  pub name: Option<String>,
  pub address: Option<String>,
  pub image: Option<ImageFile>,
}

#[derive(Debug)]
pub struct UserSubmission {
  pub profile: UserProfile,
  pub image: Option<ImageFile>,
}

pub fn validate_user(form: UserForm) -> Result<UserSubmission, FieldErrors> {
  let mut errors = FieldErrors::new();
  let name = required(&mut errors, "name", form.name, REQUIRED);
  let address = required(&mut errors, "address", form.address, REQUIRED);
  let image = check_image(&mut errors, "image", form.image);

  match (name, address) {
    (Some(name), Some(address)) if errors.is_empty() => Ok(UserSubmission {
      profile: UserProfile {
        name,
        address,
        image: None,
      },
      image,
    }),
    _ => Err(errors),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_and_address_are_required() {
    let errors = validate_user(UserForm::default()).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["address", "name"]);
  }

  #[test]
  fn bad_image_fails_an_otherwise_valid_form() {
    let form = UserForm {
      name: Some("Rina".to_string()),
      address: Some("Jl. Merdeka 1".to_string()),
      image: Some(ImageFile {
        file_name: "avatar.bmp".to_string(),
        content_type: "image/bmp".to_string(),
        bytes: vec![1, 2, 3],
      }),
    };
    let errors = validate_user(form).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["image"]);
  }
}
