// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
  pub cloud_name: String,
  pub upload_preset: String,
  pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs on the in-memory store.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  /// `None` disables image uploads.
  pub cloudinary: Option<CloudinaryConfig>,
  pub seed_db: bool,
  /// In-memory store only: seeds an admin user holding this session token.
  pub dev_admin_token: Option<String>,
  /// One JSON object per log line instead of the human-readable format.
  pub log_json: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      database_max_connections: 5,
      cloudinary: None,
      seed_db: false,
      dev_admin_token: None,
      log_json: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
    let defaults = Self::default();

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var(get_env("SERVER_PORT"), "SERVER_PORT", defaults.server_port)?;
    let database_url = get_env("DATABASE_URL");
    let database_max_connections = parse_var(
      get_env("DATABASE_MAX_CONNECTIONS"),
      "DATABASE_MAX_CONNECTIONS",
      defaults.database_max_connections,
    )?;

    let cloudinary = match (get_env("CLOUDINARY_CLOUD_NAME"), get_env("CLOUDINARY_UPLOAD_PRESET")) {
      (Some(cloud_name), Some(upload_preset)) => Some(CloudinaryConfig {
        cloud_name,
        upload_preset,
        api_base: get_env("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE.to_string()),
      }),
      (None, None) => None,
      _ => {
        return Err(AppError::Config(
          "CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET must be set together".to_string(),
        ))
      }
    };

    let seed_db = parse_var(get_env("SEED_DB"), "SEED_DB", defaults.seed_db)?;
    let dev_admin_token = get_env("DEV_ADMIN_TOKEN");
    let log_json = parse_var(get_env("LOG_JSON"), "LOG_JSON", defaults.log_json)?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      cloudinary,
      seed_db,
      dev_admin_token,
      log_json,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(value: Option<String>, name: &str, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match value {
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value: {}", name, e))),
    None => Ok(default),
  }
}
