use serde::{Deserialize, Serialize};

use crate::{ir::TargetData, LowerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    #[default]
    Host,
    Isa(String),
    PointerSize(u32),
}

impl TargetSpec {
    pub fn resolve(&self) -> Result<TargetData> {
        match self {
            TargetSpec::Host => TargetData::host(),
            TargetSpec::Isa(name) => TargetData::from_isa(name),
            TargetSpec::PointerSize(0) => Err(LowerError::Config(
                "pointer size must be at least one byte".to_string(),
            )),
            TargetSpec::PointerSize(size) => Ok(TargetData::new(*size)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub target: TargetSpec,
    /// Prefix named struct names with their package path.
    pub qualify_named: bool,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            target: TargetSpec::Host,
            qualify_named: true,
        }
    }
}

impl ProgramConfig {
    pub fn with_target(target: TargetSpec) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LowerError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LowerError::Config(e.to_string()))
    }
}
