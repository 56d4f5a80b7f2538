//! Tests for Monte Carlo runs
//!
//! These tests verify:
//! - Result shape (one balance per trial, success rate bounds)
//! - Seeded runs are reproducible and trial-index addressable
//! - Trials stop early on a depleted portfolio
//! - Both trial failure policies

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use super::{reference_portfolio, sustainable_plan};
use crate::config::{MonteCarloConfig, SimulationConfig, TrialFailurePolicy};
use crate::error::{AccountError, SimulationError};
use crate::model::{Portfolio, TaxTable};
use crate::simulation::{RetirementSimulator, batch_seed, simulate_trial};

#[test]
fn test_zero_iterations() {
    let simulator = RetirementSimulator::new(reference_portfolio(), SimulationConfig::default());
    let result = simulator.run_monte_carlo(&MonteCarloConfig::new(0)).unwrap();

    assert_eq!(result.success_rate, 0.0);
    assert!(result.final_balances.is_empty());
    assert_eq!(result.failed_trials, 0);
}

#[test]
fn test_one_balance_per_trial() {
    let (portfolio, config) = sustainable_plan();
    let simulator = RetirementSimulator::new(portfolio, config);

    for iterations in [1, 10, 100, 101, 250] {
        let result = simulator
            .run_monte_carlo(&MonteCarloConfig::new(iterations).with_seed(3))
            .unwrap();
        assert_eq!(result.final_balances.len(), iterations);
        assert!((0.0..=1.0).contains(&result.success_rate));
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let (portfolio, config) = sustainable_plan();
    let simulator = RetirementSimulator::new(portfolio, config);
    let mc = MonteCarloConfig::new(300).with_seed(42);

    let a = simulator.run_monte_carlo(&mc).unwrap();
    let b = simulator.run_monte_carlo(&mc).unwrap();
    assert_eq!(a, b);

    let c = simulator
        .run_monte_carlo(&MonteCarloConfig::new(300).with_seed(43))
        .unwrap();
    assert_ne!(a.final_balances, c.final_balances);
}

#[test]
fn test_trials_are_independent_draws() {
    let (portfolio, config) = sustainable_plan();
    let simulator = RetirementSimulator::new(portfolio, config);
    let result = simulator
        .run_monte_carlo(&MonteCarloConfig::new(50).with_seed(11))
        .unwrap();

    let first = result.final_balances[0];
    assert!(result.final_balances.iter().skip(1).any(|b| *b != first));
}

#[test]
fn test_balances_are_ordered_by_trial_index() {
    let (portfolio, config) = sustainable_plan();
    let table = TaxTable::default();
    let seed = 7;
    let result = RetirementSimulator::new(portfolio.clone(), config.clone())
        .run_monte_carlo(&MonteCarloConfig::new(230).with_seed(seed))
        .unwrap();

    let mut expected = Vec::new();
    for batch in 0..3 {
        let mut rng = SmallRng::seed_from_u64(batch_seed(seed, batch));
        let size = if batch == 2 { 30 } else { 100 };
        for _ in 0..size {
            let trial_seed = rng.next_u64();
            expected.push(simulate_trial(&portfolio, &config, &table, trial_seed).unwrap());
        }
    }

    assert_eq!(result.final_balances, expected);
}

#[test]
fn test_prefix_stable_across_iteration_counts() {
    let (portfolio, config) = sustainable_plan();
    let simulator = RetirementSimulator::new(portfolio, config);

    let small = simulator
        .run_monte_carlo(&MonteCarloConfig::new(100).with_seed(5))
        .unwrap();
    let large = simulator
        .run_monte_carlo(&MonteCarloConfig::new(250).with_seed(5))
        .unwrap();

    assert_eq!(small.final_balances[..], large.final_balances[..100]);
}

#[test]
fn test_zero_volatility_matches_deterministic_run() {
    let (portfolio, config) = sustainable_plan();
    let config = config.deterministic();
    let simulator = RetirementSimulator::new(portfolio, config);

    let expected = simulator.run_deterministic().unwrap().last().unwrap().total;
    let result = simulator
        .run_monte_carlo(&MonteCarloConfig::new(20).with_seed(1))
        .unwrap();

    assert!(result.final_balances.iter().all(|b| *b == expected));
    assert_eq!(result.success_rate, 1.0);
}

#[test]
fn test_depleted_portfolio_stops_trial() {
    let config = SimulationConfig {
        annual_contribution: 0.0,
        ..Default::default()
    };

    let empty = RetirementSimulator::new(Portfolio::new(0.0, 0.0, 0.0), config.clone());
    let result = empty
        .run_monte_carlo(&MonteCarloConfig::new(10).with_seed(0))
        .unwrap();
    assert!(result.final_balances.iter().all(|b| *b == 0.0));
    assert_eq!(result.success_rate, 0.0);

    // No floor reset: the negative starting total is reported as-is
    let negative = RetirementSimulator::new(Portfolio::new(-1_000.0, 0.0, 0.0), config);
    let result = negative
        .run_monte_carlo(&MonteCarloConfig::new(3).with_seed(0))
        .unwrap();
    assert_eq!(result.final_balances, vec![-1_000.0; 3]);
}

#[test]
fn test_failing_trial_aborts_batch() {
    let config = SimulationConfig {
        investment_std_dev: 0.0,
        ..Default::default()
    };
    let simulator = RetirementSimulator::new(reference_portfolio(), config);

    let err = simulator
        .run_monte_carlo(&MonteCarloConfig::new(5).with_seed(0))
        .unwrap_err();

    match &err {
        SimulationError::TrialFailed { trial, .. } => assert_eq!(*trial, 0),
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        err.root(),
        SimulationError::Account(AccountError::InsufficientFunds { .. })
    ));
}

#[test]
fn test_failing_trials_can_be_recorded() {
    let config = SimulationConfig {
        investment_std_dev: 0.0,
        ..Default::default()
    };
    let simulator = RetirementSimulator::new(reference_portfolio(), config);
    let mc = MonteCarloConfig::new(5)
        .with_seed(0)
        .with_failure_policy(TrialFailurePolicy::RecordAsFailure);

    let result = simulator.run_monte_carlo(&mc).unwrap();

    assert_eq!(result.failed_trials, 5);
    assert_eq!(result.final_balances, vec![0.0; 5]);
    assert_eq!(result.success_rate, 0.0);
}

#[test]
fn test_templates_unchanged() {
    let (portfolio, config) = sustainable_plan();
    let simulator = RetirementSimulator::new(portfolio.clone(), config.clone());

    simulator
        .run_monte_carlo(&MonteCarloConfig::new(20).with_seed(9))
        .unwrap();

    assert_eq!(simulator.portfolio(), &portfolio);
    assert_eq!(simulator.config(), &config);
}

#[test]
fn test_unseeded_run_has_expected_shape() {
    let (portfolio, config) = sustainable_plan();
    let result = RetirementSimulator::new(portfolio, config)
        .run_monte_carlo(&MonteCarloConfig::new(10))
        .unwrap();
    assert_eq!(result.iterations(), 10);
}
