//! Toggle-able pipeline components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Maximum length of a component name, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 128;

/// A named, toggle-able unit of a larger pipeline.
///
/// The `config` payload is opaque and never interpreted by the engine.
/// Names are trimmed of surrounding whitespace and validated on construction,
/// on deserialization and on every rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponent")]
pub struct Component {
    name: String,
    enabled: bool,
    config: Map<String, Value>,
}

/// Component as stored in external files, before validation.
#[derive(Debug, Deserialize)]
struct RawComponent {
    name: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    config: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

impl TryFrom<RawComponent> for Component {
    type Error = Error;

    fn try_from(raw: RawComponent) -> Result<Self> {
        Ok(Self {
            name: validate_name(&raw.name)?,
            enabled: raw.enabled,
            config: raw.config,
        })
    }
}

/// Trim a component name and check its length constraints.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("name", "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(Error::validation(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters, got {len}"),
        ));
    }
    Ok(trimmed.to_string())
}

impl Component {
    /// Create an enabled component with an empty config.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            name: validate_name(name.as_ref())?,
            enabled: true,
            config: Map::new(),
        })
    }

    /// Set whether the component participates in the baseline.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Attach an opaque config payload.
    #[must_use]
    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    /// Rename the component. The name is left unchanged if invalid.
    pub fn set_name(&mut self, name: impl AsRef<str>) -> Result<()> {
        self.name = validate_name(name.as_ref())?;
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn config_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.config
    }
}
