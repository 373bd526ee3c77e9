//! Component inventory loading from YAML.
//!
//! Expected format:
//!
//! ```yaml
//! - name: retriever
//!   enabled: true
//!   config:
//!     top_k: 5
//! - name: reranker
//! ```

use std::path::Path;

use ablation_core::Component;
use anyhow::{Context, Result, bail};

/// Read and validate a component list from a YAML file.
pub fn load_components(path: &Path) -> Result<Vec<Component>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read components from {}", path.display()))?;
    parse_components(&contents).with_context(|| format!("invalid components in {}", path.display()))
}

/// Parse a YAML list of components.
pub fn parse_components(yaml: &str) -> Result<Vec<Component>> {
    let raw: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    if !raw.is_sequence() {
        bail!("components YAML must be a list of component objects");
    }
    Ok(serde_yaml::from_value(raw)?)
}
