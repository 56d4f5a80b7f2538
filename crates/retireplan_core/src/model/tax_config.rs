//! Tax table types
//!
//! A tax table holds one progressive schedule per filing status plus a flat
//! capital gains rate. The calculation logic lives in the `taxes` module.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::TaxTableError;

/// Key into the bracket table, e.g. "single" or "married"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilingStatus(String);

impl FilingStatus {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn single() -> Self {
        Self::new("single")
    }

    pub fn married() -> Self {
        Self::new("married")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FilingStatus {
    fn default() -> Self {
        Self::single()
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FilingStatus {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

fn unbounded() -> f64 {
    f64::INFINITY
}

fn is_unbounded(limit: &f64) -> bool {
    limit.is_infinite()
}

/// A single bracket in a progressive schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Income up to which this bracket's rate applies. Omitted in files for the top bracket.
    #[serde(default = "unbounded", skip_serializing_if = "is_unbounded")]
    pub upper_limit: f64,
    /// Marginal rate for income inside this bracket (e.g., 0.24 for 24%)
    pub rate: f64,
}

impl TaxBracket {
    pub const fn new(upper_limit: f64, rate: f64) -> Self {
        Self { upper_limit, rate }
    }

    pub const fn top(rate: f64) -> Self {
        Self::new(f64::INFINITY, rate)
    }
}

/// Progressive schedules keyed by filing status, plus the capital gains rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    pub brackets: FxHashMap<FilingStatus, Vec<TaxBracket>>,
    /// Flat rate applied to realized gains (e.g., 0.26375)
    pub capital_gains_rate: f64,
}

impl TaxTable {
    #[must_use]
    pub fn new(capital_gains_rate: f64) -> Self {
        Self {
            brackets: FxHashMap::default(),
            capital_gains_rate,
        }
    }

    /// Add or replace the schedule for `status`
    #[must_use]
    pub fn with_schedule(mut self, status: FilingStatus, brackets: Vec<TaxBracket>) -> Self {
        self.brackets.insert(status, brackets);
        self
    }

    pub fn schedule(&self, status: &FilingStatus) -> Option<&[TaxBracket]> {
        self.brackets.get(status).map(Vec::as_slice)
    }

    /// Filing statuses in sorted order
    pub fn statuses(&self) -> Vec<&FilingStatus> {
        let mut statuses: Vec<_> = self.brackets.keys().collect();
        statuses.sort();
        statuses
    }

    /// German income tax zones for 2025, flattened to marginal brackets.
    /// Capital gains use the Abgeltungsteuer plus solidarity surcharge.
    pub fn german_2025() -> Self {
        Self::new(0.26375)
            .with_schedule(
                FilingStatus::single(),
                vec![
                    TaxBracket::new(11_604.0, 0.0),
                    TaxBracket::new(17_005.0, 0.14),
                    TaxBracket::new(66_760.0, 0.24),
                    TaxBracket::new(277_825.0, 0.42),
                    TaxBracket::top(0.45),
                ],
            )
            .with_schedule(
                FilingStatus::married(),
                vec![
                    TaxBracket::new(23_208.0, 0.0),
                    TaxBracket::new(34_010.0, 0.14),
                    TaxBracket::new(133_520.0, 0.24),
                    TaxBracket::new(555_650.0, 0.42),
                    TaxBracket::top(0.45),
                ],
            )
    }

    /// Check schedule shape: strictly increasing limits ending at +inf, rates in [0, 1]
    pub fn validate(&self) -> Result<(), TaxTableError> {
        if !(0.0..=1.0).contains(&self.capital_gains_rate) {
            return Err(TaxTableError::RateOutOfRange {
                status: None,
                rate: self.capital_gains_rate,
            });
        }

        for status in self.statuses() {
            let brackets = &self.brackets[status];
            let Some(last) = brackets.last() else {
                return Err(TaxTableError::EmptySchedule(status.clone()));
            };

            let mut prev_limit = f64::NEG_INFINITY;
            for (index, bracket) in brackets.iter().enumerate() {
                if !(0.0..=1.0).contains(&bracket.rate) {
                    return Err(TaxTableError::RateOutOfRange {
                        status: Some(status.clone()),
                        rate: bracket.rate,
                    });
                }
                // NaN fails this comparison too
                if !(bracket.upper_limit > prev_limit) {
                    return Err(TaxTableError::NonIncreasingLimit {
                        status: status.clone(),
                        index,
                    });
                }
                prev_limit = bracket.upper_limit;
            }

            if last.upper_limit != f64::INFINITY {
                return Err(TaxTableError::BoundedTopBracket(status.clone()));
            }
        }
        Ok(())
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::german_2025()
    }
}
