//! On-disk document shapes.
//!
//! These are serialization concerns only: ingestion turns any of them back
//! into a single [`AblationResult`](crate::AblationResult).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AblationConfig;
use crate::error::Result;
use crate::result::{AblationResult, ImportanceScores};
use crate::run::AblationRun;

/// Hint written into every study plan.
pub const DEFAULT_INSTRUCTIONS: &str =
    "Fill in 'metrics' dict for each run, then use 'analyze' to compute importance.";

/// The combined shape: a config, its generated runs, and fill-in instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub config: AblationConfig,

    pub runs: Vec<AblationRun>,

    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// When the plan was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

impl StudyPlan {
    /// Create a plan stamped with the current time.
    #[must_use]
    pub fn new(config: AblationConfig, runs: Vec<AblationRun>) -> Self {
        Self {
            config,
            runs,
            instructions: default_instructions(),
            generated_at: Some(Utc::now()),
        }
    }

    #[must_use]
    pub fn into_result(self) -> AblationResult {
        AblationResult::with_runs(self.config, self.runs)
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub component: String,
    pub importance: f64,
}

/// Analysis output: the importance map and the descending ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub component_importance: ImportanceScores,
    pub ranking: Vec<RankingEntry>,
}

impl AnalysisReport {
    /// Build a report from a ranked result and its ranking.
    #[must_use]
    pub fn new(result: &AblationResult, ranking: Vec<(String, f64)>) -> Self {
        Self {
            component_importance: result.component_importance.clone(),
            ranking: ranking
                .into_iter()
                .map(|(component, importance)| RankingEntry {
                    component,
                    importance,
                })
                .collect(),
        }
    }
}

/// Render runs as one JSON object per line.
pub fn runs_to_jsonl(runs: &[AblationRun]) -> Result<String> {
    let mut out = String::new();
    for run in runs {
        out.push_str(&serde_json::to_string(run)?);
        out.push('\n');
    }
    Ok(out)
}
