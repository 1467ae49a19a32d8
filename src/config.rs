//! Runtime configuration. Values come from three layers, highest priority
//! first: command-line flags, `config.toml` in the data directory, built-in
//! defaults. Application files live in `~/.ampleit`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::BaseDirs;
use serde::Deserialize;
use tracing::info;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".ampleit";
/// Optional configuration file inside the data directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// SQLite catalog picked up automatically when present in the data directory.
const CATALOG_FILE_NAME: &str = "catalog.sqlite";
/// Log file written inside the data directory.
const LOG_FILE_NAME: &str = "ampleit.log";
/// Songs shown in the Home screen's "Recently Added" section by default.
const DEFAULT_RECENT_LIMIT: usize = 5;

/// Command-line flags.
#[derive(Parser, Debug, Default)]
#[command(name = "ampleit", about = "Terminal music library with playlists and a play queue")]
pub struct CliArgs {
    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to a SQLite catalog used to seed the library.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `ampleit=trace`.
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Shape of `config.toml`. Every key is optional.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub recent_limit: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Fully merged configuration handed to the rest of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Catalog explicitly requested by the user. A missing file is an error.
    pub catalog_path: Option<PathBuf>,
    /// Filter directive; `None` defers to the environment.
    pub log_level: Option<String>,
    pub recent_limit: usize,
}

impl AppConfig {
    /// Merge CLI flags with the config file found in the user's data dir.
    pub fn resolve(cli: CliArgs) -> Result<Self> {
        Self::resolve_in(cli, default_data_dir()?)
    }

    /// Same as [`AppConfig::resolve`] with an explicit data directory.
    pub fn resolve_in(cli: CliArgs, data_dir: PathBuf) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let path = data_dir.join(CONFIG_FILE_NAME);
                if path.exists() {
                    FileConfig::load(&path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        let config = Self {
            catalog_path: cli.catalog.or(file.catalog_path),
            log_level: cli.log_level.or(file.log_level),
            recent_limit: file.recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT),
            data_dir,
        };
        info!(data_dir = %config.data_dir.display(), "configuration resolved");
        Ok(config)
    }

    /// Catalog file looked up when no explicit path was configured.
    pub fn default_catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

/// Resolve `~/.ampleit`.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
