use crate::{HdiffError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "hdiff.toml";

fn default_context_lines() -> usize {
    3
}

fn default_jobs() -> usize {
    1
}

/// Persisted defaults; every field can be overridden from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Lines of context to include before and after changes.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Number of worker threads for directory comparison.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Regex for files/directories to exclude in directory mode.
    #[serde(default)]
    pub exclude: Option<String>,

    /// Apply Unicode rules for white space and case.
    #[serde(default)]
    pub unicode: bool,

    /// Report identical file pairs.
    #[serde(default)]
    pub show_identical: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            jobs: default_jobs(),
            exclude: None,
            unicode: false,
            show_identical: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub exists: bool,
}

/// Load configuration, preferring an `hdiff.toml` next to the binary over
/// the per-user config directory.
pub fn load_config() -> Result<LoadedConfig> {
    let path = resolve_config_path()?;
    let exists = path.exists();

    let config = if exists {
        let data = fs::read_to_string(&path)?;
        toml::from_str(&data).map_err(|e| HdiffError::Config(e.to_string()))?
    } else {
        AppConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path,
        exists,
    })
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(config).map_err(|e| HdiffError::Config(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

fn resolve_config_path() -> Result<PathBuf> {
    if let Some(portable_path) = portable_config_path() {
        if portable_path.exists() {
            return Ok(portable_path);
        }
    }

    let dirs = ProjectDirs::from("", "hdiff", "hdiff")
        .ok_or_else(|| HdiffError::Config("Unable to determine config directory".to_string()))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn portable_config_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
}
