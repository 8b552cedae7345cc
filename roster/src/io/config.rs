//! Roster configuration stored under `.roster/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::storage::{DEFAULT_STORAGE_KEY, write_atomic};
use crate::technician::SortMetric;

/// Roster configuration (TOML).
///
/// Meant to be edited by hand. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RosterConfig {
    /// Name of the durable entry holding the roster (`<key>.json`).
    pub storage_key: String,

    /// Metric used by `roster list` when `--sort` is not given.
    pub default_sort: SortMetric,

    /// Start from the numbered seed roster when nothing is stored yet.
    pub seed_when_empty: bool,

    /// Directory for export files. Defaults to `.roster/exports`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_sort: SortMetric::default(),
            seed_when_empty: true,
            export_dir: None,
        }
    }
}

impl RosterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(anyhow!("storage_key must not be empty"));
        }
        if !self
            .storage_key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(anyhow!(
                "storage_key '{}' may only contain ASCII letters, digits, '-' and '_'",
                self.storage_key
            ));
        }
        if let Some(dir) = &self.export_dir {
            if dir.as_os_str().is_empty() {
                return Err(anyhow!("export_dir must not be empty when set"));
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RosterConfig::default()`.
pub fn load_config(path: &Path) -> Result<RosterConfig> {
    if !path.exists() {
        let cfg = RosterConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RosterConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RosterConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf).with_context(|| format!("write config {}", path.display()))
}
