//! Simulation configuration
//!
//! `SimulationConfig` is the read-only template for a run. The simulator
//! never mutates it; runs work on derived copies.
//!
//! # Conceptual Organization
//!
//! **Your situation**: `current_age`, `retirement_age`, `end_age`, `filing_status`
//!
//! **Your plan**: `annual_contribution`, `retirement_expenses`
//!
//! **World assumptions**: `investment_return`, `investment_std_dev`, `inflation_rate`

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::FilingStatus;

/// Inputs for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub current_age: u32,
    pub retirement_age: u32,
    pub end_age: u32,
    /// Deposited into the tax-deferred account every year before retirement
    pub annual_contribution: f64,
    /// Expense need in the first simulated year, inflated every year after
    pub retirement_expenses: f64,
    pub investment_return: f64,
    pub investment_std_dev: f64,
    pub inflation_rate: f64,
    #[serde(default)]
    pub filing_status: FilingStatus,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 65,
            end_age: 95,
            annual_contribution: 15_000.0,
            retirement_expenses: 60_000.0,
            investment_return: 0.07,
            investment_std_dev: 0.15,
            inflation_rate: 0.03,
            filing_status: FilingStatus::single(),
        }
    }
}

impl SimulationConfig {
    /// Copy of this config with randomness disabled
    #[must_use]
    pub fn deterministic(&self) -> Self {
        Self {
            investment_std_dev: 0.0,
            ..self.clone()
        }
    }

    /// Number of ages from `current_age` to `end_age`, inclusive
    pub fn simulated_years(&self) -> usize {
        if self.end_age < self.current_age {
            0
        } else {
            (self.end_age - self.current_age) as usize + 1
        }
    }

    pub fn ages(&self) -> std::ops::RangeInclusive<u32> {
        self.current_age..=self.end_age
    }

    pub fn is_retired_at(&self, age: u32) -> bool {
        age >= self.retirement_age
    }

    /// Check the age ordering and numeric sanity of the inputs.
    ///
    /// The simulator does not call this; callers decide whether to enforce it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.current_age <= self.retirement_age && self.retirement_age <= self.end_age) {
            return Err(ConfigError::AgeOrdering {
                current_age: self.current_age,
                retirement_age: self.retirement_age,
                end_age: self.end_age,
            });
        }

        let numeric = [
            ("annual_contribution", self.annual_contribution),
            ("retirement_expenses", self.retirement_expenses),
            ("investment_return", self.investment_return),
            ("investment_std_dev", self.investment_std_dev),
            ("inflation_rate", self.inflation_rate),
        ];
        if let Some((field, _)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(*field));
        }

        if self.investment_std_dev < 0.0 {
            return Err(ConfigError::NegativeStdDev(self.investment_std_dev));
        }
        Ok(())
    }
}

/// What a Monte Carlo run does when a single trial errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialFailurePolicy {
    /// Abort the whole batch with the trial's error
    #[default]
    Abort,
    /// Record the trial as a terminal balance of 0.0 and keep going
    RecordAsFailure,
}

/// Settings for a Monte Carlo run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    /// Base seed; `None` draws one from the thread-local generator
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub failure_policy: TrialFailurePolicy,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            seed: None,
            failure_policy: TrialFailurePolicy::Abort,
        }
    }
}

impl MonteCarloConfig {
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: TrialFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_copy() {
        let config = SimulationConfig::default();
        let det = config.deterministic();
        assert_eq!(det.investment_std_dev, 0.0);
        assert_eq!(config.investment_std_dev, 0.15);
        assert_eq!(det.current_age, config.current_age);
    }

    #[test]
    fn test_simulated_years() {
        let config = SimulationConfig::default();
        assert_eq!(config.simulated_years(), 66);
        assert_eq!(config.ages().count(), 66);

        let inverted = SimulationConfig {
            current_age: 50,
            end_age: 40,
            ..Default::default()
        };
        assert_eq!(inverted.simulated_years(), 0);
    }

    #[test]
    fn test_simulated_years_full_age_range() {
        let config = SimulationConfig {
            current_age: 0,
            end_age: u32::MAX,
            ..Default::default()
        };
        assert_eq!(config.simulated_years(), u32::MAX as usize + 1);
    }

    #[test]
    fn test_validate() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));

        let bad_ages = SimulationConfig {
            retirement_age: 100,
            ..Default::default()
        };
        assert!(matches!(
            bad_ages.validate(),
            Err(ConfigError::AgeOrdering { .. })
        ));

        let bad_std = SimulationConfig {
            investment_std_dev: -0.1,
            ..Default::default()
        };
        assert_eq!(bad_std.validate(), Err(ConfigError::NegativeStdDev(-0.1)));

        let nan_rate = SimulationConfig {
            inflation_rate: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            nan_rate.validate(),
            Err(ConfigError::NonFinite("inflation_rate"))
        );
    }

    #[test]
    fn test_filing_status_defaults_when_missing() {
        let json = r#"{
            "current_age": 40, "retirement_age": 60, "end_age": 90,
            "annual_contribution": 1000.0, "retirement_expenses": 2000.0,
            "investment_return": 0.05, "investment_std_dev": 0.1, "inflation_rate": 0.02
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.filing_status, FilingStatus::single());
    }

    #[test]
    fn test_monte_carlo_config_builder() {
        let config = MonteCarloConfig::new(250)
            .with_seed(9)
            .with_failure_policy(TrialFailurePolicy::RecordAsFailure);
        assert_eq!(config.iterations, 250);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.failure_policy, TrialFailurePolicy::RecordAsFailure);
    }
}
