//! Normalization of populated result files into an [`AblationResult`].
//!
//! Two shapes are accepted:
//!
//! - **Combined**: one JSON object with a `config` section and a `runs` list,
//!   as written by the study plan.
//! - **Bare runs**: one run record per line, paired with a config supplied
//!   separately (or inferred, when explicitly requested).
//!
//! Both shapes produce the same canonical result; every run and the config
//! are validated here, before any computation.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::component::Component;
use crate::config::AblationConfig;
use crate::error::{Error, Result, Section};
use crate::result::AblationResult;
use crate::run::AblationRun;

const RUN_ID_KEY: &str = "run_id";

/// Builder for ingesting a result document.
#[derive(Debug, Clone, Default)]
pub struct ResultIngest {
    config: Option<AblationConfig>,
    infer_config: bool,
}

impl ResultIngest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config to pair with bare run records. Ignored for combined documents,
    /// which carry their own.
    #[must_use]
    pub fn with_config(mut self, config: Option<AblationConfig>) -> Self {
        self.config = config;
        self
    }

    /// Infer a config from bare run records when none was supplied.
    #[must_use]
    pub fn infer_config(mut self, infer: bool) -> Self {
        self.infer_config = infer;
        self
    }

    /// Parse either shape from text.
    ///
    /// A single JSON object that is neither a combined document nor a run
    /// record is rejected as a shape error rather than read line by line.
    pub fn parse(self, text: &str) -> Result<AblationResult> {
        let trimmed = text.trim();
        if trimmed.starts_with('{')
            && let Ok(Value::Object(document)) = serde_json::from_str::<Value>(trimmed)
        {
            if is_combined(&document) {
                return self.ingest_combined(document);
            }
            if !document.contains_key(RUN_ID_KEY) {
                return Err(Error::MissingSection {
                    section: Section::Config,
                    detail: "result documents must contain `config` and `runs` sections",
                });
            }
        }
        let runs = parse_run_lines(text)?;
        self.ingest_runs(runs)
    }

    /// Build a result from a combined `{config, runs}` document.
    pub fn ingest_combined(self, mut document: Map<String, Value>) -> Result<AblationResult> {
        let config = document.remove(Section::Config.as_str()).ok_or(Error::MissingSection {
            section: Section::Config,
            detail: "combined documents must embed the study config",
        })?;
        let runs = document.remove(Section::Runs.as_str()).ok_or(Error::MissingSection {
            section: Section::Runs,
            detail: "combined documents must contain a `runs` list",
        })?;

        if self.config.is_some() {
            debug!("combined document carries its own config; ignoring supplied config");
        }

        let config: AblationConfig = serde_json::from_value(config)?;
        let runs: Vec<AblationRun> = serde_json::from_value(runs)?;
        debug!(runs = runs.len(), "ingested combined document");
        Ok(AblationResult::with_runs(config, runs))
    }

    /// Build a result from bare run records.
    pub fn ingest_runs(self, runs: Vec<AblationRun>) -> Result<AblationResult> {
        let config = match self.config {
            Some(config) => config,
            None if self.infer_config => infer_config(&runs)?,
            None => {
                return Err(Error::MissingSection {
                    section: Section::Config,
                    detail: "bare run records need a separately supplied config",
                });
            }
        };
        debug!(runs = runs.len(), "ingested bare run records");
        Ok(AblationResult::with_runs(config, runs))
    }
}

fn is_combined(document: &Map<String, Value>) -> bool {
    document.contains_key(Section::Config.as_str()) || document.contains_key(Section::Runs.as_str())
}

/// Parse one run record per non-blank line.
pub fn parse_run_lines(text: &str) -> Result<Vec<AblationRun>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line.trim()).map_err(|source| Error::JsonLine {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Parse a config document: either a bare config object or a combined
/// document whose `config` section is used.
pub fn parse_config_document(text: &str) -> Result<AblationConfig> {
    let mut value: Value = serde_json::from_str(text)?;
    if let Some(section) = value
        .as_object_mut()
        .and_then(|document| document.remove(Section::Config.as_str()))
    {
        value = section;
    }
    Ok(serde_json::from_value(value)?)
}

/// Derive a config from run snapshots: every component name seen (sorted,
/// enabled) and every metric name observed (sorted).
pub fn infer_config(runs: &[AblationRun]) -> Result<AblationConfig> {
    let names: BTreeSet<&str> = runs
        .iter()
        .flat_map(|run| run.components())
        .map(Component::name)
        .collect();
    let metrics: BTreeSet<&str> = runs
        .iter()
        .flat_map(|run| run.metrics().keys())
        .map(String::as_str)
        .collect();

    let components = names
        .into_iter()
        .map(Component::new)
        .collect::<Result<Vec<_>>>()?;
    debug!(
        components = components.len(),
        metrics = metrics.len(),
        "inferred config from runs"
    );
    AblationConfig::new(components, metrics.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{"base_components": [{"name": "ret"}], "metrics_to_track": ["accuracy"]}"#;

    const RUN_LINES: &str = concat!(
        r#"{"run_id": "baseline-abc", "disabled_component": null, "components": [{"name": "ret", "enabled": true, "config": {}}], "metrics": {"accuracy": 0.9}}"#,
        "\n",
        r#"{"run_id": "ablate-ret-xyz", "disabled_component": "ret", "components": [{"name": "ret", "enabled": false, "config": {}}], "metrics": {"accuracy": 0.7}}"#,
        "\n",
    );

    fn combined() -> String {
        format!(
            r#"{{"config": {CONFIG}, "runs": [{{"run_id": "baseline-1", "metrics": {{"accuracy": 0.9}}}}], "instructions": "fill me"}}"#
        )
    }

    fn config() -> AblationConfig {
        serde_json::from_str(CONFIG).unwrap()
    }

    // ==================== Combined Shape Tests ====================

    #[test]
    fn combined_document_is_ingested() {
        let result = ResultIngest::new().parse(&combined()).unwrap();

        assert_eq!(result.config, config());
        assert_eq!(result.runs.len(), 1);
        assert!(result.runs[0].is_baseline());
        assert!(result.component_importance.is_empty());
    }

    #[test]
    fn combined_document_prefers_embedded_config() {
        let other = AblationConfig::new(
            vec![Component::new("other").unwrap()],
            vec!["latency".into()],
        )
        .unwrap();

        let result = ResultIngest::new()
            .with_config(Some(other))
            .parse(&combined())
            .unwrap();

        assert_eq!(result.config, config());
    }

    #[test]
    fn combined_document_without_runs_fails() {
        let text = format!(r#"{{"config": {CONFIG}}}"#);
        let err = ResultIngest::new().parse(&text).unwrap_err();

        assert!(matches!(
            err,
            Error::MissingSection {
                section: Section::Runs,
                ..
            }
        ));
    }

    #[test]
    fn combined_document_without_config_fails() {
        let err = ResultIngest::new()
            .with_config(Some(config()))
            .parse(r#"{"runs": []}"#)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingSection {
                section: Section::Config,
                ..
            }
        ));
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn combined_document_with_invalid_run_fails() {
        let text = format!(r#"{{"config": {CONFIG}, "runs": [{{"run_id": " "}}]}}"#);
        let err = ResultIngest::new().parse(&text).unwrap_err();

        assert!(err.to_string().contains("run_id"));
    }

    #[test]
    fn combined_document_with_invalid_config_fails() {
        let text = r#"{"config": {"base_components": [], "metrics_to_track": ["x"]}, "runs": []}"#;
        assert!(ResultIngest::new().parse(text).is_err());
    }

    // ==================== Bare Runs Tests ====================

    #[test]
    fn bare_runs_with_config_are_ingested() {
        let result = ResultIngest::new()
            .with_config(Some(config()))
            .parse(RUN_LINES)
            .unwrap();

        assert_eq!(result.runs.len(), 2);
        assert_eq!(result.runs[1].disabled_component(), Some("ret"));
    }

    #[test]
    fn bare_runs_without_config_fail() {
        let err = ResultIngest::new().parse(RUN_LINES).unwrap_err();

        assert!(matches!(
            err,
            Error::MissingSection {
                section: Section::Config,
                ..
            }
        ));
    }

    #[test]
    fn single_run_line_is_bare_runs() {
        let line = RUN_LINES.lines().next().unwrap();
        let result = ResultIngest::new()
            .with_config(Some(config()))
            .parse(line)
            .unwrap();

        assert_eq!(result.runs.len(), 1);
    }

    #[test]
    fn object_without_sections_is_a_shape_error() {
        let text = serde_json::to_string_pretty(&config()).unwrap();
        let err = ResultIngest::new()
            .with_config(Some(config()))
            .parse(&text)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingSection {
                section: Section::Config,
                ..
            }
        ));
        assert!(err.to_string().contains("runs"));
    }

    #[test]
    fn parse_reports_line_numbers_past_leading_blanks() {
        let err = ResultIngest::new()
            .with_config(Some(config()))
            .parse("\n\nnot json\n")
            .unwrap_err();

        assert!(matches!(err, Error::JsonLine { line: 3, .. }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = format!("\n\n{RUN_LINES}\n   \n");
        let runs = parse_run_lines(&text).unwrap();
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let text = format!("{RUN_LINES}not json\n");
        let err = parse_run_lines(&text).unwrap_err();

        assert!(matches!(err, Error::JsonLine { line: 3, .. }));
    }

    #[test]
    fn inferred_config_is_built_from_runs() {
        let result = ResultIngest::new()
            .infer_config(true)
            .parse(RUN_LINES)
            .unwrap();

        let names: Vec<_> = result
            .config
            .base_components()
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(names, ["ret"]);
        assert_eq!(result.config.metrics_to_track(), ["accuracy"]);
    }

    #[test]
    fn supplied_config_wins_over_inference() {
        let supplied = AblationConfig::new(
            vec![Component::new("other").unwrap()],
            vec!["latency".into()],
        )
        .unwrap();

        let result = ResultIngest::new()
            .with_config(Some(supplied.clone()))
            .infer_config(true)
            .parse(RUN_LINES)
            .unwrap();

        assert_eq!(result.config, supplied);
    }

    #[test]
    fn inference_sorts_and_deduplicates() {
        let runs = vec![
            AblationRun::new(
                "r1",
                None,
                vec![Component::new("zeta").unwrap(), Component::new("alpha").unwrap()],
            )
            .unwrap()
            .with_metrics([("b".to_string(), 1.0), ("a".to_string(), 2.0)].into()),
            AblationRun::new("r2", Some("alpha".into()), vec![Component::new("alpha").unwrap()])
                .unwrap()
                .with_metrics([("c".to_string(), 1.0)].into()),
        ];

        let config = infer_config(&runs).unwrap();

        let names: Vec<_> = config.base_components().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(config.metrics_to_track(), ["a", "b", "c"]);
    }

    #[test]
    fn inference_without_metrics_fails() {
        let runs = vec![AblationRun::new("r1", None, vec![Component::new("a").unwrap()]).unwrap()];
        assert!(infer_config(&runs).unwrap_err().is_validation());
    }

    // ==================== Config Document Tests ====================

    #[test]
    fn config_document_accepts_bare_config() {
        assert_eq!(parse_config_document(CONFIG).unwrap(), config());
    }

    #[test]
    fn config_document_accepts_combined_document() {
        assert_eq!(parse_config_document(&combined()).unwrap(), config());
    }

    #[test]
    fn config_document_rejects_invalid_json() {
        assert!(matches!(
            parse_config_document("{not json").unwrap_err(),
            Error::Json(_)
        ));
    }
}
