//! Configuration management
//!
//! Storage location, analysis thresholds and capture defaults, kept in a TOML
//! file under the platform config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::ReportOptions;
use crate::experience::PrivacyLevel;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where experiences and reports are stored
    #[serde(default)]
    pub storage: StorageConfig,
    /// Analysis thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Defaults applied when capturing
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum distinct domains for a location to count as a hotspot
    #[serde(default = "default_hotspot_min_diversity")]
    pub hotspot_min_diversity: usize,
    /// Interdisciplinary connections shown in a report
    #[serde(default = "default_connection_limit")]
    pub connection_limit: usize,
}

fn default_hotspot_min_diversity() -> usize {
    3
}

fn default_connection_limit() -> usize {
    10
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hotspot_min_diversity: default_hotspot_min_diversity(),
            connection_limit: default_connection_limit(),
        }
    }
}

impl AnalysisConfig {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            hotspot_min_diversity: self.hotspot_min_diversity,
            connection_limit: self.connection_limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Learner ID used when `capture` is run without `--learner`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_learner: Option<String>,
    /// Privacy level given to new captures
    #[serde(default)]
    pub default_privacy: PrivacyLevel,
}

impl Config {
    /// Load configuration from the default location, writing defaults if missing
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().context("Config path has no parent")?;
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory holding experiences and reports
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => data_dir(),
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "learning-atlas", "learning-atlas")
        .context("Failed to get project directories")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Get the default data directory path
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("Configuration ({})", config_path()?.display());
    println!("  storage.data_dir:               {}", config.storage_dir()?.display());
    println!("  analysis.hotspot_min_diversity: {}", config.analysis.hotspot_min_diversity);
    println!("  analysis.connection_limit:      {}", config.analysis.connection_limit);
    println!(
        "  capture.default_learner:        {}",
        config.capture.default_learner.as_deref().unwrap_or("(none)")
    );
    println!("  capture.default_privacy:        {}", config.capture.default_privacy);
    Ok(())
}

/// Get default configuration as TOML string
pub fn default_config_toml() -> String {
    toml::to_string_pretty(&Config::default()).unwrap_or_default()
}
