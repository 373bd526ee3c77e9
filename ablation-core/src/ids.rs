//! Run identifier generation.
//!
//! Run IDs have the form `baseline-<suffix>` or `ablate-<component>-<suffix>`
//! where the suffix is 8 lowercase hex characters drawn per run.

use std::cell::Cell;

use uuid::Uuid;

/// Prefix for the baseline run's identifier.
pub const BASELINE_PREFIX: &str = "baseline";

/// Prefix for ablation run identifiers.
pub const ABLATION_PREFIX: &str = "ablate";

/// Length of the hex suffix appended to every run ID.
pub const SUFFIX_LEN: usize = 8;

/// Source of run-ID suffixes.
///
/// Implemented for any `Fn() -> String`, so tests can pass a closure.
pub trait RunIdGenerator {
    /// Produce a fresh suffix for one run.
    fn suffix(&self) -> String;
}

impl<F> RunIdGenerator for F
where
    F: Fn() -> String,
{
    fn suffix(&self) -> String {
        self()
    }
}

/// Random suffixes taken from a UUIDv4.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRunIds;

impl RunIdGenerator for RandomRunIds {
    fn suffix(&self) -> String {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(SUFFIX_LEN);
        hex
    }
}

/// Deterministic suffixes counting up from zero: `00000000`, `00000001`, ...
#[derive(Debug, Default)]
pub struct SequentialRunIds {
    next: Cell<u32>,
}

impl SequentialRunIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `start`.
    pub fn starting_at(start: u32) -> Self {
        Self {
            next: Cell::new(start),
        }
    }
}

impl RunIdGenerator for SequentialRunIds {
    fn suffix(&self) -> String {
        let n = self.next.get();
        self.next.set(n.wrapping_add(1));
        format!("{n:08x}")
    }
}

/// Build the baseline run ID.
#[must_use]
pub fn baseline_run_id(suffix: &str) -> String {
    format!("{BASELINE_PREFIX}-{suffix}")
}

/// Build the run ID for ablating `component`.
#[must_use]
pub fn ablation_run_id(component: &str, suffix: &str) -> String {
    format!("{ABLATION_PREFIX}-{component}-{suffix}")
}
