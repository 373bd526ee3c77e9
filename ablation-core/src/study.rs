//! The ablation study engine.
//!
//! [`AblationStudy`] expands a config into runs and reduces populated runs
//! into importance scores. It holds no state between calls other than its
//! run-ID generator.

use std::cmp::Ordering;

use tracing::{debug, instrument, warn};

use crate::component::Component;
use crate::config::AblationConfig;
use crate::error::Result;
use crate::ids::{RandomRunIds, RunIdGenerator, ablation_run_id, baseline_run_id};
use crate::result::{AblationResult, ImportanceScores};
use crate::run::AblationRun;

/// Number of decimal places importance scores are rounded to.
pub const IMPORTANCE_PRECISION: i32 = 6;

/// Generates ablation runs and scores component importance.
///
/// ```
/// use ablation_core::{AblationResult, AblationStudy, Component};
///
/// let study = AblationStudy::new();
/// let config = study
///     .configure(
///         vec![Component::new("retriever")?, Component::new("reranker")?],
///         vec!["accuracy".to_string()],
///     )?;
/// let mut runs = study.generate_runs(&config);
/// assert_eq!(runs.len(), 3);
///
/// runs[0].record_metric("accuracy", 0.87);
/// runs[1].record_metric("accuracy", 0.71);
/// runs[2].record_metric("accuracy", 0.85);
///
/// let mut result = AblationResult::with_runs(config, runs);
/// let ranking = study.rank_components(&mut result);
/// assert_eq!(ranking[0], ("retriever".to_string(), 0.16));
/// # Ok::<(), ablation_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AblationStudy<G = RandomRunIds> {
    ids: G,
}

impl AblationStudy {
    /// Create an engine with random run-ID suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: RunIdGenerator> AblationStudy<G> {
    /// Create an engine drawing run-ID suffixes from `ids`.
    pub fn with_id_generator(ids: G) -> Self {
        Self { ids }
    }

    /// Build a validated config with a single repetition.
    ///
    /// Duplicate component names are accepted; their runs and scores share a
    /// key and later entries win.
    pub fn configure(
        &self,
        components: Vec<Component>,
        metrics: Vec<String>,
    ) -> Result<AblationConfig> {
        let config = AblationConfig::new(components, metrics)?;
        for name in config.duplicate_component_names() {
            warn!(component = name, "duplicate component name; runs will share a key");
        }
        Ok(config)
    }

    /// Generate the baseline run followed by one run per enabled component.
    ///
    /// Components already disabled in the config appear disabled in every
    /// snapshot and get no run of their own.
    pub fn generate_runs(&self, config: &AblationConfig) -> Vec<AblationRun> {
        let base = config.base_components();
        let mut runs = Vec::with_capacity(base.len() + 1);

        runs.push(AblationRun::from_parts(
            baseline_run_id(&self.ids.suffix()),
            None,
            base.to_vec(),
        ));

        for (index, component) in base.iter().enumerate() {
            if !component.enabled() {
                debug!(component = component.name(), "skipping disabled component");
                continue;
            }

            let mut snapshot = base.to_vec();
            snapshot[index].set_enabled(false);

            runs.push(AblationRun::from_parts(
                ablation_run_id(component.name(), &self.ids.suffix()),
                Some(component.name().to_string()),
                snapshot,
            ));
        }

        debug!(
            runs = runs.len(),
            components = base.len(),
            "generated ablation runs"
        );
        runs
    }

    /// Score each ablated component as `baseline mean - ablated mean`.
    ///
    /// Means average every metric of a run together; a run with no metrics
    /// has mean `0.0`. Returns an empty map when there is no baseline or the
    /// baseline has no metrics. If several runs disable the same component,
    /// the last one's score is kept.
    #[instrument(skip_all, fields(runs = result.runs.len()))]
    pub fn compute_importance(&self, result: &AblationResult) -> ImportanceScores {
        let mut importance = ImportanceScores::new();

        let Some(baseline) = result.baseline() else {
            debug!("no baseline run; nothing to compute");
            return importance;
        };
        if baseline.metrics().is_empty() {
            debug!(run_id = baseline.run_id(), "baseline has no metrics");
            return importance;
        }

        for metric in result.config.metrics_to_track() {
            if !baseline.metrics().contains_key(metric) {
                warn!(metric = %metric, "tracked metric missing from baseline");
            }
        }

        let baseline_mean = baseline.mean_metric();

        for run in result.runs.iter() {
            let Some(name) = run.disabled_component() else {
                continue;
            };
            let score = round_score(baseline_mean - run.mean_metric());
            if importance.insert(name.to_string(), score).is_some() {
                warn!(component = name, run_id = run.run_id(), "duplicate ablation run; keeping later score");
            }
        }

        debug!(components = importance.len(), baseline_mean, "computed importance");
        importance
    }

    /// Compute importance, store it on `result`, and return it sorted by score
    /// descending. Equal scores keep their computed order.
    pub fn rank_components(&self, result: &mut AblationResult) -> Vec<(String, f64)> {
        let importance = self.compute_importance(result);
        result.component_importance = importance.clone();

        let mut ranking: Vec<(String, f64)> = importance.into_iter().collect();
        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranking
    }
}

fn round_score(value: f64) -> f64 {
    let scale = 10f64.powi(IMPORTANCE_PRECISION);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    // `+ 0.0` folds -0.0 into 0.0
    scaled.round() / scale + 0.0
}
