//! Scenario files
//!
//! A scenario bundles the starting balances, the plan, and the tax table in
//! one YAML document:
//!
//! ```yaml
//! portfolio:
//!   taxable: 100000.0
//!   tax_deferred: 200000.0
//!   tax_exempt: 50000.0
//! config:
//!   current_age: 30
//!   retirement_age: 65
//!   end_age: 95
//!   annual_contribution: 15000.0
//!   retirement_expenses: 60000.0
//!   investment_return: 0.07
//!   investment_std_dev: 0.15
//!   inflation_rate: 0.03
//!   filing_status: single
//! ```
//!
//! `tax_table` is optional and defaults to the German 2025 schedules.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use retireplan_core::error::{ConfigError, TaxTableError};
use retireplan_core::{FilingStatus, Portfolio, RetirementSimulator, SimulationConfig, TaxTable};
use serde::{Deserialize, Serialize};

/// Error types for scenario loading and validation
#[derive(Debug)]
pub enum ScenarioError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(String),
    Serialize(String),
    Config(ConfigError),
    TaxTable(TaxTableError),
    UnknownFilingStatus(FilingStatus),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io { path, source } => {
                write!(f, "IO error on {}: {source}", path.display())
            }
            ScenarioError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ScenarioError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            ScenarioError::Config(e) => write!(f, "Invalid config: {e}"),
            ScenarioError::TaxTable(e) => write!(f, "Invalid tax table: {e}"),
            ScenarioError::UnknownFilingStatus(status) => {
                write!(f, "Filing status '{status}' is not in the tax table")
            }
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io { source, .. } => Some(source),
            ScenarioError::Config(e) => Some(e),
            ScenarioError::TaxTable(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything needed to run a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub portfolio: Portfolio,
    #[serde(default)]
    pub config: SimulationConfig,
    #[serde(default)]
    pub tax_table: TaxTable,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            portfolio: Portfolio::new(100_000.0, 200_000.0, 50_000.0),
            config: SimulationConfig::default(),
            tax_table: TaxTable::default(),
        }
    }
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        serde_saphyr::from_str(yaml).map_err(|e| ScenarioError::Parse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        serde_saphyr::to_string(self).map_err(|e| ScenarioError::Serialize(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded scenario");
        Ok(scenario)
    }

    pub fn save(&self, path: &Path) -> Result<(), ScenarioError> {
        let yaml = self.to_yaml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ScenarioError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, yaml).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject scenarios the engine would run but whose output is meaningless
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.config.validate().map_err(ScenarioError::Config)?;
        self.tax_table.validate().map_err(ScenarioError::TaxTable)?;
        if self.tax_table.schedule(&self.config.filing_status).is_none() {
            return Err(ScenarioError::UnknownFilingStatus(
                self.config.filing_status.clone(),
            ));
        }
        Ok(())
    }

    pub fn simulator(&self) -> RetirementSimulator {
        RetirementSimulator::new(self.portfolio.clone(), self.config.clone())
            .with_tax_table(self.tax_table.clone())
    }
}
