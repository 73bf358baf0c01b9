use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::emi::{DueBasis, ZeroRatePolicy};
use crate::error::{ClearEmiError, Result};
use crate::portfolio::SortOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// loans.json, same shape as the browser app's stored document
    Json,
    /// clearemi.db
    Sqlite,
}

impl Default for StorageBackend {
    fn default() -> Self {
        if cfg!(feature = "sqlite") {
            StorageBackend::Sqlite
        } else {
            StorageBackend::Json
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub zero_rate: ZeroRatePolicy,
    #[serde(default)]
    pub due_basis: DueBasis,
    #[serde(default)]
    pub default_sort: SortOrder,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            storage: StorageBackend::default(),
            currency_symbol: default_currency_symbol(),
            zero_rate: ZeroRatePolicy::default(),
            due_basis: DueBasis::default(),
            default_sort: SortOrder::default(),
        }
    }
}

impl Settings {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("clearemi")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("clearemi")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring unreadable {}: {e}", path.display());
                Settings::default()
            }
        }
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ClearEmiError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    log::debug!("saved settings to {}", settings_path().display());
    Ok(())
}

pub fn settings_file_path() -> PathBuf {
    settings_path()
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
