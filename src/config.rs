use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    CATALOG_ENV_VAR, DEFAULT_MAX_BACKUPS, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};
use crate::model::CategoryFilter;
use crate::paths::{config_path, default_catalog_path};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UIConfig,
    pub store: StoreConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    pub theme: Theme,
    pub window_width: f32,
    pub window_height: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `~` is expanded. `None` means the platform data dir.
    pub catalog_path: Option<String>,
    pub backup_on_save: bool,
    pub max_backups: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub confirm_delete: bool,
    pub remember_filters: bool,
    pub last_search: String,
    pub last_category: CategoryFilter,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            backup_on_save: true,
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            confirm_delete: false,
            remember_filters: true,
            last_search: String::new(),
            last_category: CategoryFilter::All,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&contents)?);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Catalogue location: `PLUGDEX_CATALOG`, then `store.catalog_path`,
    /// then the platform default.
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve_catalog_path(std::env::var(CATALOG_ENV_VAR).ok())
    }

    fn resolve_catalog_path(&self, env_override: Option<String>) -> PathBuf {
        env_override
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.store.catalog_path.clone())
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
            .unwrap_or_else(default_catalog_path)
    }
}
