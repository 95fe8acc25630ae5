//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming the engine data folder
pub const DATA_DIR_ENV: &str = "SONEX_DATA_DIR";

/// Engine configuration
///
/// Owned by the engine for its whole lifetime; there is no ambient global
/// configuration state. All tuning constants have working defaults so an
/// embedder can start with `EngineConfig::default()` plus a data dir.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Folder holding the durable JSON documents (jobs, memory weights)
    pub data_dir: PathBuf,

    /// Prompts longer than this many chars are truncated before processing
    pub max_prompt_chars: usize,

    /// Reward applied automatically when the engine's own style suggestion
    /// is adopted for a job
    pub auto_adopt_delta: f32,

    /// Reward applied on explicit caller-initiated promotion
    pub promote_delta: f32,

    /// Target duration (seconds) handed to providers when a job sets none
    pub default_duration_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_prompt_chars: 1000,
            auto_adopt_delta: 0.05,
            promote_delta: 0.1,
            default_duration_secs: 10,
        }
    }
}

impl EngineConfig {
    /// Configuration rooted at an explicit data folder
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

/// Optional tuning overrides accepted from the TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    max_prompt_chars: Option<usize>,
    auto_adopt_delta: Option<f32>,
    promote_delta: Option<f32>,
    default_duration_secs: Option<u32>,
}

/// Data folder resolution priority order:
/// 1. Explicit argument (highest priority)
/// 2. `SONEX_DATA_DIR` environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    // Priority 1: explicit argument
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(file) = load_file_config(&config_path) {
            if let Some(dir) = file.data_dir {
                return dir;
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Load configuration with file overrides applied over defaults
///
/// Missing config file is not an error; the compiled defaults apply.
pub fn load(explicit_data_dir: Option<&str>) -> Result<EngineConfig> {
    let mut config = EngineConfig {
        data_dir: resolve_data_dir(explicit_data_dir),
        ..EngineConfig::default()
    };

    if let Ok(config_path) = locate_config_file() {
        let file = load_file_config(&config_path)?;
        if let Some(v) = file.max_prompt_chars {
            config.max_prompt_chars = v;
        }
        if let Some(v) = file.auto_adopt_delta {
            config.auto_adopt_delta = v;
        }
        if let Some(v) = file.promote_delta {
            config.promote_delta = v;
        }
        if let Some(v) = file.default_duration_secs {
            config.default_duration_secs = v;
        }
    }

    Ok(config)
}

fn load_file_config(path: &PathBuf) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Locate the platform config file, erroring if none exists
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/sonex/config.toml first, then /etc/sonex/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("sonex").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/sonex/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("sonex").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sonex"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}
