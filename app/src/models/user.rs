// src/models/user.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Accounts are created by the authentication provider; this backend only reads and edits profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub name: Option<String>,
  pub email: Option<String>,
  pub address: Option<String>,
  pub image: Option<String>,
  pub role: String,
}

/// The user fields shown on a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserContact {
  pub email: Option<String>,
  pub name: Option<String>,
  pub address: Option<String>,
}

/// Validated profile update. An `image` of `None` keeps the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
  pub name: String,
  pub address: String,
  pub image: Option<String>,
}
