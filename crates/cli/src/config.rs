//! Configuration management for the CLI

use anyhow::{Context, Result};
use clap::ValueEnum;
use report_lib::BrowserEngine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration, read from `~/.config/loadscope/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default output format (`table` or `json`)
    pub default_format: Option<String>,
    /// Engine assumed when building a report from raw artifacts
    pub default_engine: Option<String>,
}

impl Config {
    /// Load configuration from the user's config file, if any
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Output format: flag, then config default, then table
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        if let Some(format) = flag {
            return Ok(format);
        }
        match &self.default_format {
            Some(name) => OutputFormat::from_str(name, true)
                .map_err(|e| anyhow::anyhow!("Invalid default_format in config: {}", e)),
            None => Ok(OutputFormat::default()),
        }
    }

    /// Engine: flag, then config default, then chromium
    pub fn resolve_engine(&self, flag: Option<BrowserEngine>) -> Result<BrowserEngine> {
        if let Some(engine) = flag {
            return Ok(engine);
        }
        match &self.default_engine {
            Some(name) => name
                .parse()
                .context("Invalid default_engine in config"),
            None => Ok(BrowserEngine::default()),
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("loadscope").join("config.json"))
    }
}
