//! Retirement portfolio projection library
//!
//! This crate projects a portfolio split across taxable, tax-deferred and
//! tax-exempt accounts year by year. It supports:
//! - Pre-retirement contributions into the tax-deferred account
//! - Deterministic or normally distributed annual growth
//! - Progressive income tax from a pluggable bracket table
//! - Flat-rate capital gains tax
//! - Deterministic trajectories and Monte Carlo success rates
//!
//! ```ignore
//! use retireplan_core::{MonteCarloConfig, Portfolio, RetirementSimulator, SimulationConfig};
//!
//! let simulator = RetirementSimulator::new(
//!     Portfolio::new(100_000.0, 200_000.0, 50_000.0),
//!     SimulationConfig::default(),
//! );
//! let trajectory = simulator.run_deterministic()?;
//! let outlook = simulator.run_monte_carlo(&MonteCarloConfig::new(1_000).with_seed(42))?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod inflation;
pub mod simulation;
pub mod simulation_state;
pub mod taxes;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{MonteCarloConfig, SimulationConfig, TrialFailurePolicy};
pub use error::SimulationError;
pub use model::{
    Account, AccountKind, FilingStatus, MonteCarloResult, Portfolio, TaxBracket, TaxTable,
    YearSnapshot,
};
pub use simulation::RetirementSimulator;
