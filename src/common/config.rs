use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, EngineType, InsertionPoint};

pub fn config_file() -> Option<PathBuf> { Some(dirs::home_dir()?.join(".trellis.toml")) }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineType,
    #[serde(default)]
    pub insertion_point: InsertionPoint,
    #[serde(default = "no")]
    pub rotate_layout: bool,
    #[serde(default = "no")]
    pub maximize_single: bool,
    /// Pixels a directional resize command moves the tile edge by.
    #[serde(default = "default_resize_amount")]
    pub resize_amount: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            engine: EngineType::default(),
            insertion_point: InsertionPoint::default(),
            rotate_layout: false,
            maximize_single: false,
            resize_amount: default_resize_amount(),
        }
    }
}

impl Settings {
    /// The slice of settings the engines themselves care about.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            insertion_point: self.insertion_point,
            rotate_layout: self.rotate_layout,
        }
    }

    /// Validates settings values and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.resize_amount <= 0.0 {
            issues.push(format!(
                "resize_amount must be positive, got {}",
                self.resize_amount
            ));
        }

        if !self.resize_amount.is_finite() {
            issues.push(format!(
                "resize_amount must be finite, got {}",
                self.resize_amount
            ));
        }

        issues
    }

    /// Attempts to fix settings values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !(self.resize_amount.is_finite() && self.resize_amount > 0.0) {
            self.resize_amount = default_resize_amount();
            fixes += 1;
        }

        fixes
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;
        Ok(config)
    }

    /// Save the current config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }
}

fn no() -> bool { false }

fn default_resize_amount() -> f64 { 10.0 }
