//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# SpiceBridge configuration
# See: spiceb --help for all options

# Python module that record objects belong to
module = "spice"

# Digits after the decimal point in human-readable output
precision = 6

# Disable colored output
no_color = false
"#;

const DEFAULT_MODULE: &str = "spice";
const DEFAULT_PRECISION: usize = 6;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub module: Option<String>,
    pub precision: Option<usize>,
    pub no_color: Option<bool>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux/macOS: `~/.config/spiceb/config.toml`
    /// - Windows: `%APPDATA%\spiceb\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("spiceb").join("config.toml"))
    }

    /// Load config from the standard location. Returns default if missing.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load config from a specific file. Returns default if it can't be read.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Read value from environment variable.
    fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok()?.parse().ok()
    }

    /// Get module with precedence: env > config > default.
    pub fn module(&self) -> String {
        std::env::var("SPICEB_MODULE")
            .ok()
            .or_else(|| self.module.clone())
            .unwrap_or_else(|| DEFAULT_MODULE.to_string())
    }

    /// Get precision with precedence: env > config > default.
    pub fn precision(&self) -> usize {
        Self::env_var("SPICEB_PRECISION")
            .or(self.precision)
            .unwrap_or(DEFAULT_PRECISION)
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("SPICEB_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;
    init_config_at(&path)?;
    Ok(path)
}

/// Create a default config file at `path`, refusing to overwrite.
pub fn init_config_at(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))
}
