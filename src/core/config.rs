//! Application configuration management
//!
//! Handles loading and saving dashboard settings:
//! - Backend API base URL
//! - Sample data directory override
//! - TUI tick rate and start screen

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeskError, Result};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "MARKETDESK_CONFIG_DIR";

pub const DEFAULT_API_BASE_URL: &str = "https://clark-backend.onrender.com/api/v1";

/// Dashboard sections, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Overview,
    Customers,
    Orders,
    Products,
    Categories,
    Promotions,
    AddProduct,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[
            Section::Overview,
            Section::Customers,
            Section::Orders,
            Section::Products,
            Section::Categories,
            Section::Promotions,
            Section::AddProduct,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Customers => "customers",
            Section::Orders => "orders",
            Section::Products => "products",
            Section::Categories => "categories",
            Section::Promotions => "promotions",
            Section::AddProduct => "add-product",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Customers => "Customers",
            Section::Orders => "Orders",
            Section::Products => "Products",
            Section::Categories => "Categories",
            Section::Promotions => "Promotions",
            Section::AddProduct => "Add Product",
        }
    }
}

impl FromStr for Section {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        Section::all()
            .iter()
            .find(|section| section.key() == s)
            .copied()
            .ok_or_else(|| {
                let keys: Vec<&str> = Section::all().iter().map(|s| s.key()).collect();
                DeskError::InvalidInput(format!(
                    "Unknown screen '{s}'. Valid screens: {}",
                    keys.join(", ")
                ))
            })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Directory whose JSON files override the bundled datasets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// TUI tick interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Screen shown when the TUI starts
    #[serde(default)]
    pub default_screen: Section,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_dir: None,
            tick_rate_ms: default_tick_rate(),
            default_screen: Section::default(),
        }
    }
}

impl Config {
    /// Keys accepted by `config get/set/remove`
    pub const KEYS: &'static [&'static str] =
        &["api_base_url", "data_dir", "tick_rate_ms", "default_screen"];

    /// Load configuration from file, or defaults if it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the configuration directory
    ///
    /// `MARKETDESK_CONFIG_DIR` takes priority over the platform location.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let project_dirs = ProjectDirs::from("com", "marketdesk", "marketdesk")
            .ok_or_else(|| DeskError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().to_path_buf())
    }

    /// Read a setting by key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "api_base_url" => Ok(Some(self.api_base_url.clone())),
            "data_dir" => Ok(self.data_dir.as_ref().map(|p| p.display().to_string())),
            "tick_rate_ms" => Ok(Some(self.tick_rate_ms.to_string())),
            "default_screen" => Ok(Some(self.default_screen.to_string())),
            other => Err(Self::unknown_key(other)),
        }
    }

    /// Update a setting by key, validating the value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_base_url" => {
                let url = url::Url::parse(value)?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(DeskError::InvalidInput(format!(
                        "API base URL must be http or https, got '{}'",
                        url.scheme()
                    )));
                }
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "tick_rate_ms" => {
                let rate: u64 = value.parse().map_err(|_| {
                    DeskError::InvalidInput(format!("tick_rate_ms must be a number, got '{value}'"))
                })?;
                if rate == 0 {
                    return Err(DeskError::InvalidInput(
                        "tick_rate_ms must be greater than 0".into(),
                    ));
                }
                self.tick_rate_ms = rate;
            }
            "default_screen" => self.default_screen = value.parse()?,
            other => return Err(Self::unknown_key(other)),
        }
        Ok(())
    }

    /// Reset a setting to its default
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let defaults = Config::default();
        match key {
            "api_base_url" => self.api_base_url = defaults.api_base_url,
            "data_dir" => self.data_dir = None,
            "tick_rate_ms" => self.tick_rate_ms = defaults.tick_rate_ms,
            "default_screen" => self.default_screen = defaults.default_screen,
            other => return Err(Self::unknown_key(other)),
        }
        Ok(())
    }

    fn unknown_key(key: &str) -> DeskError {
        DeskError::InvalidInput(format!(
            "Unknown config key '{key}'. Valid keys: {}",
            Self::KEYS.join(", ")
        ))
    }
}
