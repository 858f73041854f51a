//! Configuration types.

use crate::db::rows::RowSettings;
use crate::ids::DEFAULT_NAMESPACE;
use crate::rules::ReclassifyRule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Converter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub jiffy: JiffyConfig,

    #[serde(default)]
    pub ids: IdsConfig,

    /// Reclassification rules, applied in order.
    #[serde(default = "default_rules")]
    pub rules: Vec<ReclassifyRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            jiffy: JiffyConfig::default(),
            ids: IdsConfig::default(),
            rules: default_rules(),
        }
    }
}

fn default_rules() -> Vec<ReclassifyRule> {
    vec![ReclassifyRule::default()]
}

impl Config {
    /// Load a single config file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let overlay: serde_json::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        let merged = super::merge::deep_merge(serde_json::to_value(Config::default())?, overlay);
        Ok(serde_json::from_value(merged)?)
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Timesheet export to read.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Empty Jiffy database copied to the output before writing.
    /// Without one, the output is created with just the two Jiffy tables.
    /// An empty string disables the default template.
    #[serde(default = "default_template", deserialize_with = "empty_path_is_none")]
    pub template: Option<PathBuf>,

    /// Jiffy database to write.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            template: default_template(),
            output: default_output(),
        }
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("Timesheet.xml")
}

fn default_template() -> Option<PathBuf> {
    Some(PathBuf::from("Jiffy_empty.db"))
}

fn empty_path_is_none<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let path = Option::<PathBuf>::deserialize(deserializer)?;
    Ok(path.filter(|p| !p.as_os_str().is_empty()))
}

fn default_output() -> PathBuf {
    PathBuf::from("Jiffy.db")
}

/// Per-install values written into every Jiffy row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JiffyConfig {
    /// Jiffy user id owning all rows.
    #[serde(default = "default_user_id")]
    pub user_id: i64,

    /// Time zone label for start and stop times.
    #[serde(default = "default_zone")]
    pub zone: String,
}

impl Default for JiffyConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            zone: default_zone(),
        }
    }
}

fn default_user_id() -> i64 {
    1
}

fn default_zone() -> String {
    "America/Sao_Paulo".to_string()
}

impl JiffyConfig {
    pub fn row_settings(&self) -> RowSettings {
        RowSettings {
            user_id: self.user_id,
            zone: self.zone.clone(),
        }
    }
}

/// Identifier allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsConfig {
    /// Most-significant half shared by every generated id.
    #[serde(default = "default_namespace")]
    pub namespace: i64,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> i64 {
    DEFAULT_NAMESPACE
}
