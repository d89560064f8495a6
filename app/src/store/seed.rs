// src/store/seed.rs

//! Sample catalog loaded at startup when `SEED_DB=true`.

use tracing::info;

use super::{Store, StoreResult};
use crate::models::{NewCategory, PageRequest, ProductDraft};

const CATALOG: &[(&str, &[(&str, &str, &str)])] = &[
  (
    "Books",
    &[
      ("Programming Rust, 2nd Ed.", "Systems programming with ownership, traits and async.", "49.99"),
      ("Designing Data Systems", "Storage engines, replication and stream processing.", "44.50"),
    ],
  ),
  (
    "Electronics",
    &[
      ("Mechanical Keyboard TKL", "Tenkeyless board with hot-swappable tactile switches.", "89.00"),
      ("USB-C Docking Station", "Dual display output, ethernet and 100W passthrough.", "129.90"),
    ],
  ),
];

/// Inserts the sample catalog unless categories already exist.
pub async fn seed_catalog(store: &dyn Store) -> StoreResult<()> {
  let existing = store.list_categories(PageRequest::default()).await?;
  if existing.meta.total_count > 0 {
    info!(categories = existing.meta.total_count, "Catalog already present, skipping seed.");
    return Ok(());
  }

  for (category_name, products) in CATALOG {
    let category = store
      .create_category(NewCategory {
        name: category_name.to_string(),
      })
      .await?;
    for (name, description, price) in products.iter() {
      store
        .create_product(ProductDraft {
          name: name.to_string(),
          description: description.to_string(),
          price: price.to_string(),
          category_id: category.id,
          image: None,
        })
        .await?;
    }
  }

  info!(categories = CATALOG.len(), "Sample catalog seeded.");
  Ok(())
}
