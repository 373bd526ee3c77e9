//! Ablation runs: one point in the experiment grid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::{Error, Result};

/// Metric name to observed value.
pub type Metrics = BTreeMap<String, f64>;

/// One fully specified component configuration plus its metric observations.
///
/// A run with no `disabled_component` is the baseline. `metrics` stays empty
/// until the evaluation harness fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAblationRun")]
pub struct AblationRun {
    run_id: String,
    disabled_component: Option<String>,
    components: Vec<Component>,
    metrics: Metrics,
}

#[derive(Debug, Deserialize)]
struct RawAblationRun {
    run_id: String,
    #[serde(default)]
    disabled_component: Option<String>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    metrics: Metrics,
}

impl TryFrom<RawAblationRun> for AblationRun {
    type Error = Error;

    fn try_from(raw: RawAblationRun) -> Result<Self> {
        Ok(Self::new(raw.run_id, raw.disabled_component, raw.components)?.with_metrics(raw.metrics))
    }
}

fn validate_run_id(run_id: &str) -> Result<String> {
    let trimmed = run_id.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("run_id", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

impl AblationRun {
    /// Create a run with empty metrics.
    pub fn new(
        run_id: impl AsRef<str>,
        disabled_component: Option<String>,
        components: Vec<Component>,
    ) -> Result<Self> {
        Ok(Self::from_parts(
            validate_run_id(run_id.as_ref())?,
            disabled_component.map(|name| name.trim().to_string()),
            components,
        ))
    }

    /// Assemble a run from an already-valid identifier.
    pub(crate) fn from_parts(
        run_id: String,
        disabled_component: Option<String>,
        components: Vec<Component>,
    ) -> Self {
        Self {
            run_id,
            disabled_component,
            components,
            metrics: Metrics::new(),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Name of the disabled component, or `None` for the baseline.
    pub fn disabled_component(&self) -> Option<&str> {
        self.disabled_component.as_deref()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.metrics = metrics;
    }

    /// Record a single metric observation, replacing any previous value.
    pub fn record_metric(&mut self, name: impl Into<String>, value: f64) {
        self.metrics.insert(name.into(), value);
    }

    pub fn set_run_id(&mut self, run_id: impl AsRef<str>) -> Result<()> {
        self.run_id = validate_run_id(run_id.as_ref())?;
        Ok(())
    }

    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.disabled_component.is_none()
    }

    /// Arithmetic mean of all metric values; exactly `0.0` when empty.
    #[must_use]
    pub fn mean_metric(&self) -> f64 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        self.metrics.values().sum::<f64>() / self.metrics.len() as f64
    }
}
