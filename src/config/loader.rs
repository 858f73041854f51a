//! Configuration loader with tier-based merging.
//!
//! Tiers, lowest to highest priority: built-in defaults, the project file
//! `./timesheet-jiffy/config.yaml`, the user file `~/.timesheet-jiffy/config.yaml`,
//! then environment variables. An explicit config file replaces the file tiers.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Explicit config file, overriding the tiers.
pub const ENV_CONFIG_PATH: &str = "TIMESHEET_JIFFY_CONFIG_PATH";
pub const ENV_SOURCE: &str = "TIMESHEET_JIFFY_SOURCE";
pub const ENV_OUTPUT: &str = "TIMESHEET_JIFFY_OUTPUT";
pub const ENV_TEMPLATE: &str = "TIMESHEET_JIFFY_TEMPLATE";
pub const ENV_USER_DIR: &str = "TIMESHEET_JIFFY_USER_DIR";
pub const ENV_PROJECT_DIR: &str = "TIMESHEET_JIFFY_PROJECT_DIR";

const CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    Defaults = 0,
    Project = 1,
    User = 2,
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration directories from environment and defaults.
    pub fn discover() -> Self {
        let project_dir = std::env::var(ENV_PROJECT_DIR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("timesheet-jiffy")));

        let user_dir = std::env::var(ENV_USER_DIR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".timesheet-jiffy")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn tier_files(&self) -> Vec<(ConfigTier, PathBuf)> {
        let mut files = Vec::new();
        if let Some(ref dir) = self.project_dir {
            files.push((ConfigTier::Project, dir.join(CONFIG_FILE)));
        }
        if let Some(ref dir) = self.user_dir {
            files.push((ConfigTier::User, dir.join(CONFIG_FILE)));
        }
        files
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// Config files that contributed, lowest tier first.
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration from an explicit file, or from the tiers when `None`.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                let mut config = Config::load(path)?;
                Self::apply_env_overrides(&mut config);
                Ok(Self {
                    paths: ConfigPaths::with_dirs(None, None),
                    config,
                    sources: vec![path.to_path_buf()],
                })
            }
            None => Self::load(),
        }
    }

    /// Load configuration with explicit tier directories.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        if let Ok(explicit_path) = std::env::var(ENV_CONFIG_PATH) {
            return Self::load_from(Some(Path::new(&explicit_path)));
        }

        let mut configs: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = Vec::new();

        for (tier, file) in paths.tier_files() {
            if !file.exists() {
                continue;
            }
            let parsed = std::fs::read_to_string(&file)
                .map_err(anyhow::Error::from)
                .and_then(|content| Ok(serde_yaml::from_str::<Value>(&content)?));
            match parsed {
                Ok(value) => {
                    debug!(tier = %tier, path = %file.display(), "Loaded config tier");
                    configs.push(value);
                    sources.push(file);
                }
                Err(e) => {
                    warn!(tier = %tier, path = %file.display(), error = %e, "Ignoring unreadable config file");
                }
            }
        }

        let mut config: Config = serde_json::from_value(deep_merge_all(configs))?;
        Self::apply_env_overrides(&mut config);

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut Config) {
        if let Ok(source) = std::env::var(ENV_SOURCE) {
            config.paths.source = PathBuf::from(source);
        }
        if let Ok(output) = std::env::var(ENV_OUTPUT) {
            config.paths.output = PathBuf::from(output);
        }
        if let Ok(template) = std::env::var(ENV_TEMPLATE) {
            config.paths.template = if template.is_empty() {
                None
            } else {
                Some(PathBuf::from(template))
            };
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Config files that were merged, lowest tier first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}
