use meadow_common::GridDims;
use meadow_heightfield::EdgeMode;
use meadow_instances::FieldParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Declarative scene setup: grid size, field calibration, edge behavior.
///
/// Every field has a default, so a config file only names what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub grid: GridDims,
    pub params: FieldParams,
    pub edge: EdgeMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            grid: GridDims::new(100, 100),
            params: FieldParams::default(),
            edge: EdgeMode::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
