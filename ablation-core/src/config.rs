//! Study configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::{Error, Result};

/// Full description of an ablation study.
///
/// Holds at least one component and at least one metric name. Every
/// setter re-validates and leaves the config unchanged when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAblationConfig")]
pub struct AblationConfig {
    base_components: Vec<Component>,
    metrics_to_track: Vec<String>,
    repetitions: u32,
}

/// Config as stored in external files, before validation.
#[derive(Debug, Deserialize)]
struct RawAblationConfig {
    base_components: Vec<Component>,
    metrics_to_track: Vec<String>,
    #[serde(default = "default_repetitions")]
    repetitions: u32,
}

fn default_repetitions() -> u32 {
    1
}

impl TryFrom<RawAblationConfig> for AblationConfig {
    type Error = Error;

    fn try_from(raw: RawAblationConfig) -> Result<Self> {
        Ok(Self {
            base_components: validate_components(raw.base_components)?,
            metrics_to_track: validate_metrics(raw.metrics_to_track)?,
            repetitions: validate_repetitions(raw.repetitions)?,
        })
    }
}

fn validate_components(components: Vec<Component>) -> Result<Vec<Component>> {
    if components.is_empty() {
        return Err(Error::validation(
            "base_components",
            "at least one component is required",
        ));
    }
    Ok(components)
}

fn validate_metrics(metrics: Vec<String>) -> Result<Vec<String>> {
    if metrics.is_empty() {
        return Err(Error::validation(
            "metrics_to_track",
            "at least one metric is required",
        ));
    }
    Ok(metrics.into_iter().map(|m| m.trim().to_string()).collect())
}

fn validate_repetitions(repetitions: u32) -> Result<u32> {
    if repetitions < 1 {
        return Err(Error::validation("repetitions", "must be at least 1"));
    }
    Ok(repetitions)
}

impl AblationConfig {
    /// Create a config with a single repetition.
    pub fn new(base_components: Vec<Component>, metrics_to_track: Vec<String>) -> Result<Self> {
        Ok(Self {
            base_components: validate_components(base_components)?,
            metrics_to_track: validate_metrics(metrics_to_track)?,
            repetitions: 1,
        })
    }

    /// Set the advisory repetition count.
    pub fn with_repetitions(mut self, repetitions: u32) -> Result<Self> {
        self.set_repetitions(repetitions)?;
        Ok(self)
    }

    pub fn base_components(&self) -> &[Component] {
        &self.base_components
    }

    pub fn metrics_to_track(&self) -> &[String] {
        &self.metrics_to_track
    }

    /// Repetitions per run, consumed by the evaluation harness only.
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn set_base_components(&mut self, components: Vec<Component>) -> Result<()> {
        self.base_components = validate_components(components)?;
        Ok(())
    }

    pub fn set_metrics_to_track(&mut self, metrics: Vec<String>) -> Result<()> {
        self.metrics_to_track = validate_metrics(metrics)?;
        Ok(())
    }

    pub fn set_repetitions(&mut self, repetitions: u32) -> Result<()> {
        self.repetitions = validate_repetitions(repetitions)?;
        Ok(())
    }

    /// Names that appear more than once in `base_components`, in first-seen order.
    #[must_use]
    pub fn duplicate_component_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for component in &self.base_components {
            let name = component.name();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Components that will get their own ablation run.
    pub fn enabled_components(&self) -> impl Iterator<Item = &Component> {
        self.base_components.iter().filter(|c| c.enabled())
    }
}
