//! Initialization helpers for `.roster/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::config::{RosterConfig, write_config};

/// All canonical paths within `.roster/` for a project root.
#[derive(Debug, Clone)]
pub struct RosterPaths {
    pub root: PathBuf,
    pub roster_dir: PathBuf,
    /// Directory backing the durable key-value store.
    pub data_dir: PathBuf,
    pub exports_dir: PathBuf,
    pub gitignore_path: PathBuf,
    pub config_path: PathBuf,
}

impl RosterPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let roster_dir = root.join(".roster");
        Self {
            root: root.clone(),
            roster_dir: roster_dir.clone(),
            data_dir: roster_dir.join("data"),
            exports_dir: roster_dir.join("exports"),
            gitignore_path: roster_dir.join(".gitignore"),
            config_path: roster_dir.join("config.toml"),
        }
    }

    /// Export directory from config, resolved against the project root.
    pub fn export_dir(&self, cfg: &RosterConfig) -> PathBuf {
        match &cfg.export_dir {
            Some(dir) => self.root.join(dir),
            None => self.exports_dir.clone(),
        }
    }
}

/// Options for `init_roster`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, rewrite config and scaffolding. Stored roster data is kept.
    pub force: bool,
}

/// Create `.roster/` scaffolding in `root`.
///
/// Fails if `.roster/` already exists unless `options.force` is set.
pub fn init_roster(root: &Path, options: &InitOptions) -> Result<RosterPaths> {
    let paths = RosterPaths::new(root);
    if paths.roster_dir.exists() && !options.force {
        return Err(anyhow!(
            "roster init: .roster already exists (use --force to overwrite)"
        ));
    }
    if paths.roster_dir.exists() && !paths.roster_dir.is_dir() {
        return Err(anyhow!("roster init: .roster exists but is not a directory"));
    }

    create_dir(&paths.roster_dir)?;
    create_dir(&paths.data_dir)?;
    create_dir(&paths.exports_dir)?;

    write_file(&paths.gitignore_path, ROSTER_GITIGNORE)?;
    write_config(&paths.config_path, &RosterConfig::default())?;

    info!(root = %root.display(), "roster initialized");
    Ok(paths)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))
}

const ROSTER_GITIGNORE: &str = "exports/\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;
    use crate::io::storage::{DEFAULT_STORAGE_KEY, FileStorage, RosterStorage};
    use crate::test_support::tech;

    #[test]
    fn init_creates_expected_layout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_roster(temp.path(), &InitOptions { force: false }).expect("init");

        assert!(paths.roster_dir.is_dir());
        assert!(paths.data_dir.is_dir());
        assert!(paths.exports_dir.is_dir());
        assert_eq!(
            fs::read_to_string(&paths.gitignore_path).expect("read"),
            ROSTER_GITIGNORE
        );
        assert_eq!(
            load_config(&paths.config_path).expect("config"),
            RosterConfig::default()
        );
    }

    #[test]
    fn init_without_force_refuses_existing_roster_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_roster(temp.path(), &InitOptions { force: false }).expect("init");
        let err = init_roster(temp.path(), &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn init_with_force_resets_config_but_keeps_data() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_roster(temp.path(), &InitOptions { force: false }).expect("init");
        fs::write(&paths.config_path, "storage_key = \"custom\"\n").expect("write custom");
        let storage = FileStorage::new(&paths.data_dir, DEFAULT_STORAGE_KEY);
        storage.save(&[tech("a", "Ana")]).expect("save");

        init_roster(temp.path(), &InitOptions { force: true }).expect("re-init");

        assert_eq!(
            load_config(&paths.config_path).expect("config"),
            RosterConfig::default()
        );
        assert_eq!(storage.load().expect("load").map(|r| r.len()), Some(1));
    }

    #[test]
    fn export_dir_resolves_against_root() {
        let paths = RosterPaths::new("/project");
        let cfg = RosterConfig {
            export_dir: Some(PathBuf::from("out")),
            ..RosterConfig::default()
        };
        assert_eq!(paths.export_dir(&cfg), PathBuf::from("/project/out"));
        assert_eq!(
            paths.export_dir(&RosterConfig::default()),
            PathBuf::from("/project/.roster/exports")
        );
    }
}
