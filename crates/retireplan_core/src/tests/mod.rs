//! Scenario tests for the projection engine
//!
//! Tests are organized by topic:
//! - `year_transition` - Contribution, growth and withdrawal ordering within one year
//! - `deterministic` - Full deterministic trajectories
//! - `monte_carlo` - Randomized trials, seeding and failure handling

mod monte_carlo;

use crate::config::SimulationConfig;
use crate::model::Portfolio;

/// The reference household: 30 years old, retiring at 65
pub(crate) fn reference_portfolio() -> Portfolio {
    Portfolio::new(100_000.0, 200_000.0, 50_000.0)
}

/// A plan whose taxable account never runs dry
pub(crate) fn sustainable_plan() -> (Portfolio, SimulationConfig) {
    let portfolio = Portfolio::new(3_000_000.0, 0.0, 100_000.0);
    let config = SimulationConfig {
        current_age: 60,
        retirement_age: 65,
        end_age: 90,
        annual_contribution: 10_000.0,
        retirement_expenses: 40_000.0,
        investment_return: 0.05,
        investment_std_dev: 0.10,
        inflation_rate: 0.02,
        ..Default::default()
    };
    (portfolio, config)
}

pub(crate) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "Expected {expected:.4}, got {actual:.4}"
    );
}
