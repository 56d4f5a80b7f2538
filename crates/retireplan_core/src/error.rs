use std::fmt;

use crate::model::{AccountKind, FilingStatus};

/// Errors raised by account bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub enum AccountError {
    InsufficientFunds {
        kind: AccountKind,
        requested: f64,
        available: f64,
    },
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::InsufficientFunds {
                kind,
                requested,
                available,
            } => write!(
                f,
                "insufficient funds in {kind} account: requested {requested:.2}, available {available:.2}"
            ),
        }
    }
}

impl std::error::Error for AccountError {}

/// Errors raised by the tax calculator
#[derive(Debug, Clone, PartialEq)]
pub enum TaxError {
    UnknownFilingStatus(FilingStatus),
}

impl fmt::Display for TaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxError::UnknownFilingStatus(status) => {
                write!(f, "unknown filing status '{status}'")
            }
        }
    }
}

impl std::error::Error for TaxError {}

/// Errors raised while sampling growth rates
#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    InvalidDistributionParameters {
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::InvalidDistributionParameters {
                mean,
                std_dev,
                reason,
            } => write!(
                f,
                "invalid growth distribution (mean={mean}, std_dev={std_dev}): {reason}"
            ),
        }
    }
}

impl std::error::Error for MarketError {}

/// Structural problems in a tax table
#[derive(Debug, Clone, PartialEq)]
pub enum TaxTableError {
    EmptySchedule(FilingStatus),
    NonIncreasingLimit {
        status: FilingStatus,
        index: usize,
    },
    BoundedTopBracket(FilingStatus),
    RateOutOfRange {
        status: Option<FilingStatus>,
        rate: f64,
    },
}

impl fmt::Display for TaxTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxTableError::EmptySchedule(status) => {
                write!(f, "schedule for '{status}' has no brackets")
            }
            TaxTableError::NonIncreasingLimit { status, index } => write!(
                f,
                "bracket {index} of '{status}' does not raise the upper limit"
            ),
            TaxTableError::BoundedTopBracket(status) => {
                write!(f, "top bracket of '{status}' must be unbounded")
            }
            TaxTableError::RateOutOfRange {
                status: Some(status),
                rate,
            } => write!(f, "rate {rate} in '{status}' is outside [0, 1]"),
            TaxTableError::RateOutOfRange { status: None, rate } => {
                write!(f, "capital gains rate {rate} is outside [0, 1]")
            }
        }
    }
}

impl std::error::Error for TaxTableError {}

/// Problems with simulation inputs detected by `SimulationConfig::validate`
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    AgeOrdering {
        current_age: u32,
        retirement_age: u32,
        end_age: u32,
    },
    NegativeStdDev(f64),
    NonFinite(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::AgeOrdering {
                current_age,
                retirement_age,
                end_age,
            } => write!(
                f,
                "ages must satisfy current <= retirement <= end (got {current_age}, {retirement_age}, {end_age})"
            ),
            ConfigError::NegativeStdDev(v) => {
                write!(f, "investment standard deviation must be >= 0 (got {v})")
            }
            ConfigError::NonFinite(field) => write!(f, "{field} must be a finite number"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that abort a simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Account(AccountError),
    Tax(TaxError),
    Market(MarketError),
    /// A Monte Carlo trial failed; the whole batch is aborted
    TrialFailed {
        trial: usize,
        source: Box<SimulationError>,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Account(e) => write!(f, "{e}"),
            SimulationError::Tax(e) => write!(f, "{e}"),
            SimulationError::Market(e) => write!(f, "{e}"),
            SimulationError::TrialFailed { trial, source } => {
                write!(f, "trial {trial} failed: {source}")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Account(e) => Some(e),
            SimulationError::Tax(e) => Some(e),
            SimulationError::Market(e) => Some(e),
            SimulationError::TrialFailed { source, .. } => Some(source.as_ref()),
        }
    }
}

impl SimulationError {
    /// The underlying error, with any trial context removed
    pub fn root(&self) -> &SimulationError {
        match self {
            SimulationError::TrialFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<AccountError> for SimulationError {
    fn from(err: AccountError) -> Self {
        SimulationError::Account(err)
    }
}

impl From<TaxError> for SimulationError {
    fn from(err: TaxError) -> Self {
        SimulationError::Tax(err)
    }
}

impl From<MarketError> for SimulationError {
    fn from(err: MarketError) -> Self {
        SimulationError::Market(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
