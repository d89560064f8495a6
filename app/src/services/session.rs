// src/services/session.rs

//! Bearer token to session lookup, the only part of the authentication provider this
//! backend depends on.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::Session;
use crate::store::{Store, StoreError};

#[async_trait]
pub trait SessionProvider: Send + Sync {
  /// `Ok(None)` for unknown or expired tokens.
  async fn session_for(&self, token: &str) -> Result<Option<Session>, StoreError>;
}

/// Reads the provider's session table through the datastore.
pub struct StoreSessions {
  store: Arc<dyn Store>,
}

impl StoreSessions {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl SessionProvider for StoreSessions {
  async fn session_for(&self, token: &str) -> Result<Option<Session>, StoreError> {
    self.store.find_session(token).await
  }
}
