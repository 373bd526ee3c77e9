use super::types::{
    AnalyzeConfig, CliConfig, ConfigureConfig, DEFAULT_PLAN_PATH, RawAnalyzeConfig, RawCliConfig,
    RawConfigureConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<CliConfig> {
        let user_path = Self::user_config_path();
        Self::load_layers(user_path.as_deref(), &Self::project_config_path())
    }

    /// Load and merge the given layers; later layers win. Missing files are skipped.
    pub fn load_layers(user_path: Option<&Path>, project_path: &Path) -> Result<CliConfig> {
        let mut raw = RawCliConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user_path {
            raw = Self::merge_raw(raw, Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        raw = Self::merge_raw(raw, Self::read_raw(project_path)?);

        // Convert to final config with defaults applied
        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ablation").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with ABLATION_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("ABLATION_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".ablation/config.toml")
        }
    }

    /// Save config to a specific path
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to_path(config: &CliConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(config)?;
        std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;

        Ok(())
    }

    fn read_raw(path: &Path) -> Result<RawCliConfig> {
        if !path.exists() {
            return Ok(RawCliConfig::default());
        }
        debug!(path = %path.display(), "loading config layer");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawCliConfig, overlay: RawCliConfig) -> RawCliConfig {
        RawCliConfig {
            configure: RawConfigureConfig {
                metrics: overlay.configure.metrics.or(base.configure.metrics),
                repetitions: overlay.configure.repetitions.or(base.configure.repetitions),
                output: overlay.configure.output.or(base.configure.output),
            },
            analyze: RawAnalyzeConfig {
                format: overlay.analyze.format.or(base.analyze.format),
                infer_config: overlay.analyze.infer_config.or(base.analyze.infer_config),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawCliConfig) -> CliConfig {
        CliConfig {
            configure: ConfigureConfig {
                metrics: raw.configure.metrics.unwrap_or_default(),
                repetitions: raw.configure.repetitions.unwrap_or(1),
                output: raw
                    .configure
                    .output
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAN_PATH)),
            },
            analyze: AnalyzeConfig {
                format: raw.analyze.format.unwrap_or_default(),
                infer_config: raw.analyze.infer_config.unwrap_or(false),
            },
        }
    }
}
