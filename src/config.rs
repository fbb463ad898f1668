use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aspects::{AspectDefinition, MAJOR_ASPECTS};
use crate::ephemeris::HouseSystem;
use crate::error::{ChartError, Result};

/// Environment variable naming the directory with Swiss Ephemeris data files.
pub const EPHE_PATH_ENV: &str = "SE_EPHE_PATH";

/// Settings for chart computation. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub house_system: HouseSystem,
    pub aspects: Vec<AspectDefinition>,
    pub ephemeris_path: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            house_system: HouseSystem::Placidus,
            aspects: MAJOR_ASPECTS.to_vec(),
            ephemeris_path: None,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading chart config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Fills `ephemeris_path` from `SE_EPHE_PATH` when the config left it unset.
    pub fn with_env(mut self) -> Self {
        if self.ephemeris_path.is_none() {
            self.ephemeris_path = env::var_os(EPHE_PATH_ENV).map(PathBuf::from);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        for aspect in &self.aspects {
            if !(0.0..=180.0).contains(&aspect.angle) {
                return Err(ChartError::Config(format!(
                    "{} angle {} is outside 0..=180",
                    aspect.kind, aspect.angle
                )));
            }
            if aspect.orb.is_nan() || aspect.orb < 0.0 {
                return Err(ChartError::Config(format!(
                    "{} orb {} must be non-negative",
                    aspect.kind, aspect.orb
                )));
            }
        }
        Ok(())
    }
}
