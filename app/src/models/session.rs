// src/models/session.rs

use serde::Serialize;
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
  pub id: Uuid,
  pub role: String,
  pub name: Option<String>,
  pub email: Option<String>,
}

/// A signed-in session as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
  pub token: String,
  pub user: SessionUser,
}

impl Session {
  pub fn is_admin(&self) -> bool {
    self.user.role == ADMIN_ROLE
  }
}
