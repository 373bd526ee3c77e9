//! Ablation study planning and analysis.
//!
//! This crate generates the runs of an ablation study (one baseline plus one
//! run per removable component) and turns externally measured metrics into
//! per-component importance scores and a ranking.
//!
//! # Architecture
//!
//! - **Data model** ([`Component`], [`AblationConfig`], [`AblationRun`],
//!   [`AblationResult`]) validates itself on construction, deserialization
//!   and mutation
//! - **Engine** ([`AblationStudy`]) is stateless apart from its injectable
//!   [`RunIdGenerator`]
//! - **Ingestion** ([`ResultIngest`]) normalizes combined documents and bare
//!   run records into one [`AblationResult`]
//!
//! Evaluations themselves are never run here; the harness fills in each
//! run's metrics.

mod component;
mod config;
mod document;
mod error;
mod ids;
mod ingest;
mod result;
mod run;
mod study;

// Data model
pub use component::{Component, MAX_NAME_LEN, validate_name};
pub use config::AblationConfig;
pub use result::{AblationResult, ImportanceScores};
pub use run::{AblationRun, Metrics};

// Engine
pub use study::{AblationStudy, IMPORTANCE_PRECISION};

// Run IDs
pub use ids::{
    ABLATION_PREFIX, BASELINE_PREFIX, RandomRunIds, RunIdGenerator, SUFFIX_LEN, SequentialRunIds,
    ablation_run_id, baseline_run_id,
};

// Ingestion
pub use ingest::{ResultIngest, infer_config, parse_config_document, parse_run_lines};

// Documents
pub use document::{AnalysisReport, DEFAULT_INSTRUCTIONS, RankingEntry, StudyPlan, runs_to_jsonl};

// Errors
pub use error::{Error, Result, Section};
