//! Configuration management for gcodepath
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats; the default location is the
//! platform-specific configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Output settings (header and footer files, console echo)
//! - Dialect (opcode vocabulary, comment syntax, precision)

use crate::error::{SettingsError, SettingsResult};
use gcodepath_core::{Dialect, SessionOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest fixed precision accepted for emitted numbers
pub const MAX_DECIMALS: usize = 10;

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// File copied to the top of every output
    pub header: Option<PathBuf>,
    /// File copied to the bottom of every output
    pub footer: Option<PathBuf>,
    /// Echo emitted lines to the console
    pub echo: bool,
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputSettings,
    /// G-code dialect
    pub dialect: Dialect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/gcodepath/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gcodepath").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Toml => toml::from_str(&content)?,
            Format::Json => serde_json::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), dialect = %config.dialect.name, "loaded config");
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a `.toml` or `.json` file
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = format_of(path)?;

        let content = match format {
            Format::Toml => toml::to_string_pretty(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        for (field, opcode) in self.dialect.opcodes() {
            if opcode.trim().is_empty() {
                return Err(SettingsError::invalid(
                    format!("dialect.{}", field),
                    "must not be empty",
                ));
            }
        }

        if let Some(decimals) = self.dialect.decimals {
            if decimals > MAX_DECIMALS {
                return Err(SettingsError::invalid(
                    "dialect.decimals",
                    format!("{} exceeds the maximum of {}", decimals, MAX_DECIMALS),
                ));
            }
        }

        Ok(())
    }

    /// Session options for the core engine
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            dialect: self.dialect.clone(),
            header: self.output.header.clone(),
            footer: self.output.footer.clone(),
            echo: self.output.echo,
        }
    }
}
