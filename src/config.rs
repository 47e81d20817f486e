//! Process configuration from environment variables (`.env` supported via
//! dotenvy in the entrypoint).

use std::path::PathBuf;

use crate::catalog::{DEFAULT_CATALOG_PATH, ENV_CATALOG_PATH};

pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the feedback store backend.
    pub backend_url: String,
    pub catalog_path: PathBuf,
    pub bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            backend_url: std::env::var(ENV_BACKEND_URL)
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            catalog_path: std::env::var(ENV_CATALOG_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH)),
            bind_addr: std::env::var(ENV_BIND_ADDR)
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}
