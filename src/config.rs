use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::price::PriceField;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    #[serde(default = "default_price_field")]
    pub default_price_field: String,
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_price_field() -> String {
    "Close".to_string()
}

pub const MAX_TABLE_ROWS: usize = 500;

fn default_table_rows() -> usize {
    12
}

impl UiConfig {
    pub fn price_field(&self) -> Result<PriceField> {
        self.default_price_field
            .parse::<PriceField>()
            .map_err(anyhow::Error::msg)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        config
            .ui
            .price_field()
            .context("ui.default_price_field is invalid")?;
        if config.ui.table_rows == 0 || config.ui.table_rows > MAX_TABLE_ROWS {
            bail!(
                "ui.table_rows must be between 1 and {}, got {}",
                MAX_TABLE_ROWS,
                config.ui.table_rows
            );
        }
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("STOCK_DASHBOARD_DATA") {
            if !path.trim().is_empty() {
                self.data.path = PathBuf::from(path.trim());
            }
        }
        if let Ok(dir) = std::env::var("STOCK_DASHBOARD_EXPORT_DIR") {
            if !dir.trim().is_empty() {
                self.data.export_dir = PathBuf::from(dir.trim());
            }
        }
    }
}
