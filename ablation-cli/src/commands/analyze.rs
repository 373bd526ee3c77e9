//! `analyze`: rank components from populated run results.

use std::path::{Path, PathBuf};

use ablation_core::{AblationStudy, AnalysisReport, ResultIngest, parse_config_document};
use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use tracing::{debug, info};

use crate::config::{CliConfig, OutputFormat};

/// Analyze arguments.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSONL file (one run per line) or the JSON study plan from `configure`
    #[arg(long, value_name = "FILE")]
    pub results: PathBuf,

    /// Study config (bare or a full study plan) for JSONL results
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the analysis JSON here instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Infer the config from the runs when JSONL results have none
    #[arg(long)]
    pub infer_config: bool,
}

/// Run analyze command.
pub fn run(args: AnalyzeArgs, config: &CliConfig) -> Result<()> {
    let report = analyze(&args, config)?;
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = &args.output {
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote analysis");
        println!("Analysis written to {}", path.display());
        return Ok(());
    }

    match args.format.unwrap_or(config.analyze.format) {
        OutputFormat::Json => println!("{}", json),
        OutputFormat::Table => print_ranking_table(&report),
    }
    Ok(())
}

/// Ingest the results file and rank its components.
fn analyze(args: &AnalyzeArgs, config: &CliConfig) -> Result<AnalysisReport> {
    let text = read(&args.results)?;
    let study_config = match &args.config {
        Some(path) => Some(
            parse_config_document(&read(path)?)
                .with_context(|| format!("invalid study config in {}", path.display()))?,
        ),
        None => None,
    };

    let mut result = ResultIngest::new()
        .with_config(study_config)
        .infer_config(args.infer_config || config.analyze.infer_config)
        .parse(&text)
        .with_context(|| format!("invalid results in {}", args.results.display()))?;
    debug!(runs = result.runs.len(), "ingested results");

    let ranking = AblationStudy::new().rank_components(&mut result);
    Ok(AnalysisReport::new(&result, ranking))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_ranking_table(report: &AnalysisReport) {
    if report.ranking.is_empty() {
        println!("No importance scores (missing baseline run or baseline metrics).");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Rank").fg(Color::Cyan),
        Cell::new("Component").fg(Color::Cyan),
        Cell::new("Importance").fg(Color::Cyan),
    ]);

    for (rank, entry) in report.ranking.iter().enumerate() {
        let color = if entry.importance > 0.0 {
            Color::Green
        } else if entry.importance < 0.0 {
            Color::Red
        } else {
            Color::Reset
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.component),
            Cell::new(format!("{:+.6}", entry.importance))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str =
        r#"{"base_components": [{"name": "ret"}, {"name": "rank"}], "metrics_to_track": ["accuracy"]}"#;

    const RUN_LINES: &str = concat!(
        r#"{"run_id": "baseline-abc", "disabled_component": null, "components": [], "metrics": {"accuracy": 0.9}}"#,
        "\n",
        r#"{"run_id": "ablate-ret-xyz", "disabled_component": "ret", "components": [{"name": "ret", "enabled": false}], "metrics": {"accuracy": 0.7}}"#,
        "\n",
        r#"{"run_id": "ablate-rank-xyz", "disabled_component": "rank", "components": [{"name": "rank", "enabled": false}], "metrics": {"accuracy": 0.95}}"#,
        "\n",
    );

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn args(results: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            results,
            config: None,
            output: None,
            format: None,
            infer_config: false,
        }
    }

    #[test]
    fn test_analyze_combined_document() {
        let dir = TempDir::new().unwrap();
        let runs: Vec<&str> = RUN_LINES.lines().collect();
        let document = format!(r#"{{"config": {CONFIG}, "runs": [{}]}}"#, runs.join(","));
        let results = write(&dir, "plan.json", &document);

        let report = analyze(&args(results), &CliConfig::default()).unwrap();

        assert_eq!(report.ranking.len(), 2);
        assert_eq!(report.ranking[0].component, "ret");
        assert_eq!(report.ranking[0].importance, 0.2);
        assert_eq!(report.ranking[1].importance, -0.05);
    }

    #[test]
    fn test_analyze_jsonl_with_config_file() {
        let dir = TempDir::new().unwrap();
        let mut args = args(write(&dir, "results.jsonl", RUN_LINES));
        args.config = Some(write(&dir, "config.json", CONFIG));

        let report = analyze(&args, &CliConfig::default()).unwrap();

        assert_eq!(report.component_importance.len(), 2);
    }

    #[test]
    fn test_analyze_jsonl_without_config_fails() {
        let dir = TempDir::new().unwrap();
        let args = args(write(&dir, "results.jsonl", RUN_LINES));

        let err = analyze(&args, &CliConfig::default()).unwrap_err();

        assert!(format!("{err:#}").contains("config"));
    }

    #[test]
    fn test_analyze_jsonl_with_inference_from_settings() {
        let dir = TempDir::new().unwrap();
        let args = args(write(&dir, "results.jsonl", RUN_LINES));
        let mut config = CliConfig::default();
        config.analyze.infer_config = true;

        let report = analyze(&args, &config).unwrap();

        assert_eq!(report.ranking[0].component, "ret");
    }

    #[test]
    fn test_analyze_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let mut args = args(write(&dir, "results.jsonl", RUN_LINES));
        args.config = Some(write(&dir, "config.json", CONFIG));
        let output = dir.path().join("analysis.json");
        args.output = Some(output.clone());

        run(args, &CliConfig::default()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written["ranking"][0]["component"], "ret");
        assert_eq!(written["component_importance"]["rank"], -0.05);
    }

    #[test]
    fn test_analyze_missing_results_fails() {
        let err = analyze(
            &args(PathBuf::from("/nonexistent/results.json")),
            &CliConfig::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("/nonexistent/results.json"));
    }
}
