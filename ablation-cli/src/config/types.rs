use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawCliConfig {
    #[serde(default)]
    pub configure: RawConfigureConfig,

    #[serde(default)]
    pub analyze: RawAnalyzeConfig,
}

/// `configure` defaults as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigureConfig {
    pub metrics: Option<Vec<String>>,
    pub repetitions: Option<u32>,
    pub output: Option<PathBuf>,
}

/// `analyze` defaults as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAnalyzeConfig {
    pub format: Option<OutputFormat>,
    pub infer_config: Option<bool>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub configure: ConfigureConfig,

    #[serde(default)]
    pub analyze: AnalyzeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigureConfig {
    /// Metrics tracked when `--metrics` is not given
    pub metrics: Vec<String>,

    /// Repetitions per run when `--repetitions` is not given
    pub repetitions: u32,

    /// Where the study plan is written
    pub output: PathBuf,
}

impl Default for ConfigureConfig {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            repetitions: 1,
            output: PathBuf::from(DEFAULT_PLAN_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalyzeConfig {
    /// How analysis is printed to stdout
    pub format: OutputFormat,

    /// Build a config from the runs when bare records come without one
    pub infer_config: bool,
}

/// Output format for analysis printed to stdout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

/// Default path for the study plan written by `configure`
pub const DEFAULT_PLAN_PATH: &str = "ablation_config.json";
