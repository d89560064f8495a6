// src/models/page.rs

use serde::{Deserialize, Serialize};

/// Fixed page size for every list endpoint.
pub const PAGE_SIZE: i64 = 10;

/// A 1-based page number. Anything below 1 is read as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page: i64,
}

impl PageRequest {
  pub fn new(page: Option<i64>) -> Self {
    Self {
      page: page.unwrap_or(1).max(1),
    }
  }

  pub fn page(&self) -> i64 {
    self.page
  }

  pub fn limit(&self) -> i64 {
    PAGE_SIZE
  }

  pub fn offset(&self) -> i64 {
    (self.page - 1).saturating_mul(PAGE_SIZE)
  }
}

impl Default for PageRequest {
  fn default() -> Self {
    Self::new(None)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
  pub total_count: i64,
  pub total_pages: i64,
  pub page: i64,
}

impl PageMeta {
  pub fn new(total_count: i64, request: PageRequest) -> Self {
    Self {
      total_count,
      total_pages: (total_count + PAGE_SIZE - 1) / PAGE_SIZE,
      page: request.page(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub meta: PageMeta,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Self {
    Self {
      items,
      meta: PageMeta::new(total_count, request),
    }
  }
}
