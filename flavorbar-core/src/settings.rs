use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted user preferences and credentials. Everything else in the core
/// is memory-only and rebuilt from the network on each launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    /// The targeted user id, kept as the raw string the user typed.
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub selected_project_id: Option<i64>,
    #[serde(default = "default_cookies_per_hour")]
    pub cookies_per_hour: i64,
    /// Store items marked for cookie-saving tracking.
    #[serde(default)]
    pub target_item_ids: Vec<i64>,
}

fn default_cookies_per_hour() -> i64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user_id: String::new(),
            selected_project_id: None,
            cookies_per_hour: default_cookies_per_hour(),
            target_item_ids: Vec::new(),
        }
    }
}

impl Settings {
    pub fn settings_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("flavorbar")
            .join("settings.toml"))
    }

    /// Load settings from disk. Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::settings_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings at {}", path.display()))?;
        let settings: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse settings at {}", path.display()))?;
        Ok(settings)
    }

    /// Save settings to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }
}
