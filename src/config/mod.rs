//! Configuration file management
//!
//! Loads TOML configuration files describing which asset trees to merge
//! and where to write the glyph width table.
//! Default config path: ~/.config/glyphwidths/config.toml

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::Pipeline;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "GLYPHWIDTHS_CONFIG";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Asset tree settings
    pub assets: AssetsConfig,
    /// Output settings
    pub output: OutputConfig,
}

/// Asset tree settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Base assets directory (holds `<namespace>/font/...`)
    pub base: String,
    /// Overlay packs in precedence order, later wins.
    /// Each is a directory or zip archive path, or a file:// URL
    pub overlays: Vec<String>,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Glyph width table file
    pub path: String,
    /// Work directory for the merged tree (empty = fresh temp dir per run).
    /// Cleared at the start of every run; never share between runs.
    pub work_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base: "assets".to_string(),
            overlays: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "glyph_widths.bin".to_string(),
            work_dir: String::new(),
        }
    }
}

impl Config {
    /// Get the path that would be used for loading config.
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. GLYPHWIDTHS_CONFIG environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
            warn!("{} points to missing file: {}", CONFIG_ENV, path);
        }

        // 2. User config: ~/.config/glyphwidths/config.toml
        default_config_path().filter(|p| p.exists())
    }

    /// Load configuration with priority:
    /// 1. GLYPHWIDTHS_CONFIG environment variable
    /// 2. ~/.config/glyphwidths/config.toml (user config)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the generation pipeline these settings describe
    pub fn pipeline(&self) -> Result<Pipeline> {
        if self.assets.base.is_empty() {
            bail!("No base assets directory configured");
        }
        let mut pipeline = Pipeline::new(&self.assets.base);
        for overlay in &self.assets.overlays {
            pipeline = pipeline
                .overlay(overlay)
                .with_context(|| format!("Invalid overlay: {}", overlay))?;
        }
        if !self.output.work_dir.is_empty() {
            pipeline = pipeline.work_dir(&self.output.work_dir);
        }
        Ok(pipeline)
    }

    /// Output file path
    pub fn output_path(&self) -> Result<PathBuf> {
        if self.output.path.is_empty() {
            bail!("No output path configured");
        }
        Ok(PathBuf::from(&self.output.path))
    }

    /// Write a commented template to the user config path
    pub fn write_template(force: bool) -> Result<PathBuf> {
        let config_path =
            default_config_path().ok_or_else(|| anyhow!("Config directory not found"))?;
        if config_path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                config_path.display()
            );
        }
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let body = toml::to_string_pretty(&Self::default())?;
        let content = format!(
            "# glyphwidths configuration\n\
             #\n\
             # assets.base      base assets directory (<namespace>/font, <namespace>/textures)\n\
             # assets.overlays  resource packs, later entries override earlier ones\n\
             # output.work_dir  empty = fresh temporary directory per run\n\n{}",
            body
        );
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        Ok(config_path)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glyphwidths").join("config.toml"))
}
