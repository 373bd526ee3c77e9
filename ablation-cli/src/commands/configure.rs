//! `configure`: plan an ablation study from a component inventory.

use std::path::{Path, PathBuf};

use ablation_core::{AblationStudy, StudyPlan};
use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::{debug, info};

use crate::components::load_components;
use crate::config::CliConfig;

/// Configure arguments.
#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Path to a YAML file listing components
    #[arg(long, value_name = "FILE")]
    pub components: PathBuf,

    /// Comma-separated metric names, e.g. accuracy,latency_ms
    #[arg(long)]
    pub metrics: Option<String>,

    /// Number of repetitions per ablation run
    #[arg(long)]
    pub repetitions: Option<u32>,

    /// Path to write the study plan JSON
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run configure command.
pub fn run(args: ConfigureArgs, config: &CliConfig) -> Result<()> {
    let metrics = match &args.metrics {
        Some(list) => parse_metrics(list),
        None => config.configure.metrics.clone(),
    };
    if metrics.is_empty() {
        bail!("--metrics must contain at least one metric name");
    }
    let repetitions = args.repetitions.unwrap_or(config.configure.repetitions);
    let output = args
        .output
        .unwrap_or_else(|| config.configure.output.clone());

    let components = load_components(&args.components)?;
    debug!(components = components.len(), ?metrics, "loaded component inventory");

    let study = AblationStudy::new();
    let study_config = study
        .configure(components, metrics)?
        .with_repetitions(repetitions)?;
    let runs = study.generate_runs(&study_config);
    let run_count = runs.len();

    write_plan(&StudyPlan::new(study_config, runs), &output)?;
    info!(runs = run_count, path = %output.display(), "wrote study plan");
    println!(
        "Ablation config with {} runs written to {}",
        run_count,
        output.display()
    );
    Ok(())
}

/// Split a comma-separated list, dropping blank entries.
fn parse_metrics(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

fn write_plan(plan: &StudyPlan, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
