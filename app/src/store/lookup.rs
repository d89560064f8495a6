// src/store/lookup.rs

//! Turns a datastore call into a three-way outcome so "no such row" and "the datastore
//! failed" never collapse into one value.

use std::future::Future;

use super::StoreError;
use crate::errors::AppError;

#[derive(Debug)]
pub enum Fetched<T> {
  Found(T),
  Missing,
  Failed(StoreError),
}

impl<T> Fetched<T> {
  /// `Missing` becomes the caller's not-found error; `Failed` stays a datastore error.
  pub fn found_or(self, missing: impl FnOnce() -> AppError) -> Result<T, AppError> {
    match self {
      Fetched::Found(value) => Ok(value),
      Fetched::Missing => Err(missing()),
      Fetched::Failed(e) => Err(AppError::Store(e)),
    }
  }
}

impl<T> From<Result<Option<T>, StoreError>> for Fetched<T> {
  fn from(result: Result<Option<T>, StoreError>) -> Self {
    match result {
      Ok(Some(value)) => Fetched::Found(value),
      Ok(None) => Fetched::Missing,
      Err(e) => Fetched::Failed(e),
    }
  }
}

pub async fn fetch<T, F>(call: F) -> Fetched<T>
where
  F: Future<Output = Result<Option<T>, StoreError>>,
{
  let fetched = Fetched::from(call.await);
  if let Fetched::Failed(e) = &fetched {
    tracing::error!(error = %e, "Datastore lookup failed.");
  }
  fetched
}

#[cfg(test)]
mod tests {
  use super::*;

  #[actix_web::test]
  async fn maps_each_outcome() {
    assert!(matches!(fetch(async { Ok(Some(7)) }).await, Fetched::Found(7)));
    assert!(matches!(fetch(async { Ok::<Option<i32>, _>(None) }).await, Fetched::Missing));
    assert!(matches!(
      fetch(async { Err::<Option<i32>, _>(StoreError::Constraint("fk".to_string())) }).await,
      Fetched::Failed(StoreError::Constraint(_))
    ));
  }

  #[test]
  fn failure_is_not_downgraded_to_not_found() {
    let missing = Fetched::<i32>::Missing.found_or(|| AppError::not_found("gone", "no row"));
    assert!(matches!(missing, Err(AppError::NotFound { .. })));

    let failed = Fetched::<i32>::Failed(StoreError::Constraint("fk".to_string()))
      .found_or(|| AppError::not_found("gone", "no row"));
    assert!(matches!(failed, Err(AppError::Store(_))));
  }
}
