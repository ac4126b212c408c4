//! Configuration file support for Liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub aliases: AliasConfig,
}

/// Data source and output configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the SQLite training log
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Path the report document is written to
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            output: default_output(),
        }
    }
}

/// Accepted spellings per canonical lift (matched case-insensitively)
///
/// New name variants are a config edit, not a code change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AliasConfig {
    #[serde(default = "default_squat_aliases")]
    pub squat: Vec<String>,

    #[serde(default = "default_bench_aliases")]
    pub bench: Vec<String>,

    #[serde(default = "default_deadlift_aliases")]
    pub deadlift: Vec<String>,

    #[serde(default = "default_ohp_aliases")]
    pub ohp: Vec<String>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            squat: default_squat_aliases(),
            bench: default_bench_aliases(),
            deadlift: default_deadlift_aliases(),
            ohp: default_ohp_aliases(),
        }
    }
}

// Default value functions
fn default_database() -> PathBuf {
    PathBuf::from("MyApp.db")
}

fn default_output() -> PathBuf {
    PathBuf::from("training_data.json")
}

fn default_squat_aliases() -> Vec<String> {
    vec![
        "Squat".into(),
        "Back Squat".into(),
        "Front Squat".into(),
        "Squats".into(),
    ]
}

fn default_bench_aliases() -> Vec<String> {
    vec![
        "Bench Press".into(),
        "Bench".into(),
        "Flat Bench Press".into(),
    ]
}

fn default_deadlift_aliases() -> Vec<String> {
    vec![
        "Deadlift".into(),
        "Conventional Deadlift".into(),
        "Deadlifts".into(),
    ]
}

fn default_ohp_aliases() -> Vec<String> {
    vec![
        "Overhead Press".into(),
        "OHP".into(),
        "Military Press".into(),
        "Standing Press".into(),
        "Shoulder Press".into(),
        "Barbell Overhead Press".into(),
    ]
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
