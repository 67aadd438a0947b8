use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::openai::{DEFAULT_API_URL, DEFAULT_MODEL, TEMPERATURE};
use crate::storage::Storage;

/// Runtime configuration. The classification credential is deliberately
/// not part of this file; it lives in durable storage only and never in
/// code or config.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    /// When false the task key is cleared at startup, so lists do not
    /// survive a restart.
    pub persist_tasks: bool,
    pub debug_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: Storage::default_dir(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: TEMPERATURE,
            persist_tasks: false,
            debug_logging: false,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        Storage::default_dir().join("config.json")
    }

    /// Load from a JSON file; a missing or unreadable file means defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
