use anyhow::{anyhow, Context, Result};
use needle_graph::LinkerConfig;
use needle_scanner::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// `needle.toml`: optional `[scanner]` and `[linker]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub linker: LinkerConfig,
}

impl AppConfig {
    /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scanner
            .validate()
            .map_err(|e| anyhow!("[scanner] {e}"))?;
        self.linker.validate().context("[linker]")?;
        Ok(())
    }
}
