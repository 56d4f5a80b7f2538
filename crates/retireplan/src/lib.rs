//! Command-line front end for the retirement projection engine
//!
//! Loads a YAML scenario, runs a deterministic projection or a Monte Carlo
//! batch through `retireplan_core`, and renders the results as text or JSON.

pub mod logging;
pub mod report;
pub mod scenario;

pub use logging::init_logging;
pub use scenario::{Scenario, ScenarioError};
