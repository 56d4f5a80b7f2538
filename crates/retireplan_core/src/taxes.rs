//! Tax calculation for retirement withdrawals
//!
//! Income tax is evaluated against a progressive schedule selected by filing
//! status; realized gains are taxed at a flat rate. Both read their numbers
//! from a `TaxTable` so alternate jurisdictions can be plugged in.

use crate::error::TaxError;
use crate::model::{FilingStatus, TaxBracket, TaxTable};

/// Calculate tax owed on `income` under a progressive schedule.
///
/// Brackets are `(upper_limit, rate)` pairs with strictly increasing limits.
pub fn calculate_progressive_tax(income: f64, brackets: &[TaxBracket]) -> f64 {
    let mut tax = 0.0;
    let mut prev_limit = 0.0;

    for bracket in brackets {
        if income <= prev_limit {
            break;
        }
        tax += (income.min(bracket.upper_limit) - prev_limit) * bracket.rate;
        prev_limit = bracket.upper_limit;
    }

    tax
}

/// Income tax on `income` for the given filing status
pub fn calculate_income_tax(
    income: f64,
    status: &FilingStatus,
    table: &TaxTable,
) -> Result<f64, TaxError> {
    let brackets = table
        .schedule(status)
        .ok_or_else(|| TaxError::UnknownFilingStatus(status.clone()))?;
    Ok(calculate_progressive_tax(income, brackets))
}

/// Flat-rate capital gains tax; non-positive gains owe nothing
pub fn calculate_capital_gains_tax(gains: f64, rate: f64) -> f64 {
    if gains <= 0.0 {
        return 0.0;
    }
    gains * rate
}

impl TaxTable {
    pub fn income_tax(&self, income: f64, status: &FilingStatus) -> Result<f64, TaxError> {
        calculate_income_tax(income, status, self)
    }

    pub fn capital_gains_tax(&self, gains: f64) -> f64 {
        calculate_capital_gains_tax(gains, self.capital_gains_rate)
    }
}
