use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, StocksieveError};
use crate::logic::RawLogic;

/// The project configuration: the upgrades to analyze against a stock.
#[derive(Debug, Clone)]
pub struct Project {
    pub upgrades: Vec<Upgrade>,
}

/// A named, ordered set of options plus an optional package-level
/// eligibility condition.
#[derive(Debug, Clone, Deserialize)]
pub struct Upgrade {
    pub upgrade_name: String,
    #[serde(default)]
    pub package_apply_logic: Option<RawLogic>,
    pub options: Vec<UpgradeOption>,
}

/// One concrete modification within an upgrade.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeOption {
    /// The `parameter|value` the option sets; doubles as its identifier and,
    /// when no apply logic is given, as its eligibility condition.
    pub option: String,
    #[serde(default)]
    pub apply_logic: Option<RawLogic>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default = "default_lifetime")]
    pub lifetime: f64,
}

fn default_lifetime() -> f64 {
    f64::INFINITY
}

impl Project {
    /// Load the project configuration file through the config crate; the
    /// format is inferred from the file extension (YAML in practice).
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        let raw: serde_json::Value = settings.try_deserialize()?;
        Self::from_value(raw)
    }

    /// Build a project from an already materialized nested structure.
    pub fn from_value(raw: serde_json::Value) -> Result<Self> {
        let mut mapping = match raw {
            serde_json::Value::Object(mapping) => mapping,
            other => {
                return Err(StocksieveError::Configuration(format!(
                    "the project configuration is not a mapping: {other}"
                )));
            }
        };
        let upgrades = mapping.remove("upgrades").ok_or_else(|| {
            StocksieveError::Configuration(
                "the project configuration has no upgrades defined".to_string(),
            )
        })?;
        let upgrades: Vec<Upgrade> = serde_json::from_value(upgrades).map_err(|e| {
            StocksieveError::Configuration(format!("invalid upgrades section: {e}"))
        })?;
        Ok(Self { upgrades })
    }
}
