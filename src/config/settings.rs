use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{TuneOffsets, DEFAULT_METHOD};

fn default_base_url() -> String {
    "http://api.aladhan.com".to_string()
}
fn default_method() -> u8 {
    DEFAULT_METHOD
}
fn default_latitude() -> Option<f64> {
    Some(33.6938)
}
fn default_longitude() -> Option<f64> {
    Some(73.0651)
}
fn default_location_name() -> String {
    "Islamabad".to_string()
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// AlAdhan calculation method id
    #[serde(default = "default_method")]
    pub method: u8,
    #[serde(default)]
    pub tune: TuneOffsets,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            method: default_method(),
            tune: TuneOffsets::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Whether meeqat may read the location at all. `false` behaves like a
    /// denied permission prompt.
    #[serde(default = "default_true")]
    pub allow: bool,
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: Option<f64>,
    #[serde(default = "default_longitude")]
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            allow: true,
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "meeqat").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }
}
