//! A completed ablation study.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::AblationConfig;
use crate::run::AblationRun;

/// Component name to importance score, in the order components were first seen.
pub type ImportanceScores = IndexMap<String, f64>;

/// The config, its populated runs, and the derived importance scores.
///
/// `component_importance` is derived from `runs` and is overwritten each
/// time the study is ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AblationResult {
    pub config: AblationConfig,

    #[serde(default)]
    pub runs: Vec<AblationRun>,

    #[serde(default)]
    pub component_importance: ImportanceScores,
}

impl AblationResult {
    /// Create a result with no runs yet.
    #[must_use]
    pub fn new(config: AblationConfig) -> Self {
        Self::with_runs(config, Vec::new())
    }

    #[must_use]
    pub fn with_runs(config: AblationConfig, runs: Vec<AblationRun>) -> Self {
        Self {
            config,
            runs,
            component_importance: ImportanceScores::new(),
        }
    }

    /// The first run with no disabled component.
    #[must_use]
    pub fn baseline(&self) -> Option<&AblationRun> {
        self.runs.iter().find(|run| run.is_baseline())
    }

    /// Every run that disables a component, in run order.
    pub fn ablations(&self) -> impl Iterator<Item = &AblationRun> {
        self.runs.iter().filter(|run| !run.is_baseline())
    }
}
