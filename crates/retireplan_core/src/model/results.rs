//! Simulation results
//!
//! Output types for both run modes: the per-age trajectory of a deterministic
//! run and the aggregated terminal balances of a Monte Carlo run.

use serde::{Deserialize, Serialize};

use super::portfolio::Portfolio;

/// Balances at the end of one simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub age: u32,
    pub taxable: f64,
    pub tax_deferred: f64,
    pub tax_exempt: f64,
    pub total: f64,
    /// Nominal expense level used for this year's withdrawals
    pub expenses: f64,
}

impl YearSnapshot {
    pub fn capture(age: u32, expenses: f64, portfolio: &Portfolio) -> Self {
        Self {
            age,
            taxable: portfolio.taxable().balance,
            tax_deferred: portfolio.tax_deferred().balance,
            tax_exempt: portfolio.tax_exempt().balance,
            total: portfolio.total_balance(),
            expenses,
        }
    }
}

/// Results from a Monte Carlo run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Fraction of trials ending with a strictly positive balance
    pub success_rate: f64,
    /// Terminal total balance per trial, indexed by trial number
    pub final_balances: Vec<f64>,
    /// Trials that errored and were recorded as failures
    #[serde(default)]
    pub failed_trials: usize,
}

impl MonteCarloResult {
    pub fn from_final_balances(final_balances: Vec<f64>, failed_trials: usize) -> Self {
        let success_rate = if final_balances.is_empty() {
            0.0
        } else {
            let successes = final_balances.iter().filter(|b| **b > 0.0).count();
            successes as f64 / final_balances.len() as f64
        };

        Self {
            success_rate,
            final_balances,
            failed_trials,
        }
    }

    pub fn iterations(&self) -> usize {
        self.final_balances.len()
    }

    /// Nearest-rank percentile of the terminal balances, `p` in [0, 1]
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.final_balances.is_empty() {
            return None;
        }
        let mut sorted = self.final_balances.clone();
        sorted.sort_by(f64::total_cmp);
        Some(percentile_of_sorted(&sorted, p))
    }

    pub fn summary(&self) -> MonteCarloSummary {
        if self.final_balances.is_empty() {
            return MonteCarloSummary::default();
        }

        let mut sorted = self.final_balances.clone();
        sorted.sort_by(f64::total_cmp);
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        MonteCarloSummary {
            iterations: sorted.len(),
            success_rate: self.success_rate,
            failed_trials: self.failed_trials,
            mean,
            p5: percentile_of_sorted(&sorted, 0.05),
            p50: percentile_of_sorted(&sorted, 0.50),
            p95: percentile_of_sorted(&sorted, 0.95),
        }
    }
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// Condensed view of a Monte Carlo run for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub iterations: usize,
    pub success_rate: f64,
    pub failed_trials: usize,
    pub mean: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}
