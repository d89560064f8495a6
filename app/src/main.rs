// src/main.rs

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use storefront::config::AppConfig;
use storefront::services::{CloudinaryUploader, DisabledUploader, StoreSessions, Uploader};
use storefront::store::{seed, MemoryStore, PgStore, Store};
use storefront::{build_app, AppState};

fn init_tracing(json: bool) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Configuration comes first so LOG_JSON can pick the log format.
  let app_config = Arc::new(AppConfig::from_env().context("loading configuration")?);
  init_tracing(app_config.log_json);

  tracing::info!(
    database = if app_config.database_url.is_some() { "postgres" } else { "memory" },
    uploads = app_config.cloudinary.is_some(),
    "Starting storefront server..."
  );

  let store: Arc<dyn Store> = match &app_config.database_url {
    Some(database_url) => {
      let pool = PgPoolOptions::new()
        .max_connections(app_config.database_max_connections)
        .connect(database_url)
        .await
        .context("connecting to the database")?;
      tracing::info!("Successfully connected to the database.");
      if app_config.dev_admin_token.is_some() {
        tracing::warn!("DEV_ADMIN_TOKEN is ignored when DATABASE_URL is set.");
      }
      Arc::new(PgStore::new(pool))
    }
    None => {
      tracing::warn!("DATABASE_URL not set, using the in-memory store. Data is lost on exit.");
      let memory = MemoryStore::new();
      if let Some(token) = &app_config.dev_admin_token {
        let admin_id = memory.seed_session(token, "Dev Admin", "admin");
        tracing::info!(%admin_id, "Seeded development admin session.");
      }
      Arc::new(memory)
    }
  };

  if app_config.seed_db {
    seed::seed_catalog(store.as_ref()).await.context("seeding the catalog")?;
  }

  let uploader: Arc<dyn Uploader> = match &app_config.cloudinary {
    Some(cloudinary) => Arc::new(CloudinaryUploader::new(cloudinary)),
    None => {
      tracing::warn!("Cloudinary is not configured; image uploads will fail.");
      Arc::new(DisabledUploader)
    }
  };
  let sessions = Arc::new(StoreSessions::new(store.clone()));

  let app_state = AppState::new(app_config.clone(), store, sessions, uploader).context("building application state")?;

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  actix_web::HttpServer::new(move || build_app(app_state.clone()).wrap(tracing_actix_web::TracingLogger::default()))
    .bind(&server_address)?
    .run()
    .await?;

  Ok(())
}
