//! Dashboard configuration.
//! Reads salary-dashboard.toml from the current directory or the path in the
//! SALARY_DASHBOARD_CONFIG env var. Every field has a default, so the file is optional.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::AggregateParams;

pub const CONFIG_ENV: &str = "SALARY_DASHBOARD_CONFIG";
pub const DATA_ENV: &str = "SALARY_DASHBOARD_DATA";
const DEFAULT_CONFIG_FILE: &str = "salary-dashboard.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: default_data_path() }
    }
}

fn default_data_path() -> PathBuf { PathBuf::from("dados-imersao-final.csv") }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_focus_job_title")]
    pub focus_job_title: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            histogram_bins: default_histogram_bins(),
            focus_job_title: default_focus_job_title(),
        }
    }
}

fn default_top_n()           -> usize  { 10 }
fn default_histogram_bins()  -> usize  { 30 }
fn default_focus_job_title() -> String { "Data Scientist".to_string() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width()  -> f32 { 1400.0 }
fn default_height() -> f32 { 900.0 }

impl DashboardConfig {
    /// Load config from disk, then apply env overrides.
    /// Checks SALARY_DASHBOARD_CONFIG first, then the current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::from_file_or_default(Path::new(&path))?;

        if let Ok(data) = std::env::var(DATA_ENV) {
            log::info!("Dataset path overridden by {DATA_ENV}: {data}");
            config.data.path = PathBuf::from(data);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse `path` if it exists; a missing file yields the defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.top_n == 0 {
            bail!("analysis.top_n must be at least 1");
        }
        if self.analysis.histogram_bins == 0 {
            bail!("analysis.histogram_bins must be at least 1");
        }
        if self.analysis.focus_job_title.trim().is_empty() {
            bail!("analysis.focus_job_title must not be empty");
        }
        Ok(())
    }

    pub fn aggregate_params(&self) -> AggregateParams {
        AggregateParams {
            top_n: self.analysis.top_n,
            histogram_bins: self.analysis.histogram_bins,
            focus_job_title: self.analysis.focus_job_title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_aggregate_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.aggregate_params(), AggregateParams::default());
        assert_eq!(config.data.path, PathBuf::from("dados-imersao-final.csv"));
        config.validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [analysis]
            top_n = 5

            [data]
            path = "data/salaries.parquet"
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.top_n, 5);
        assert_eq!(config.analysis.histogram_bins, 30);
        assert_eq!(config.data.path, PathBuf::from("data/salaries.parquet"));
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::from_file_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis]\ntop_n = \"ten\"\n").unwrap();
        assert!(DashboardConfig::from_file_or_default(&path).is_err());
    }

    #[test]
    fn zero_bins_fail_validation() {
        let mut config = DashboardConfig::default();
        config.analysis.histogram_bins = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.analysis.focus_job_title = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
