use crate::config::SimulationConfig;
use crate::inflation::inflate;
use crate::model::Portfolio;

/// Runtime state for one run or trial, rebuilt from the templates every time
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Age being simulated
    pub age: u32,
    /// Nominal expense need for the current year
    pub expenses: f64,
    /// Working copy of the caller's portfolio
    pub portfolio: Portfolio,
}

impl SimulationState {
    pub fn from_parameters(portfolio: &Portfolio, config: &SimulationConfig) -> Self {
        Self {
            age: config.current_age,
            expenses: config.retirement_expenses,
            portfolio: portfolio.clone(),
        }
    }

    /// Move to the next age and raise expenses by one year of inflation
    pub fn advance_year(&mut self, inflation_rate: f64) {
        self.age = self.age.saturating_add(1);
        self.expenses = inflate(self.expenses, inflation_rate);
    }
}

/// Money moved during a single simulated year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearFlows {
    pub contribution: f64,
    pub taxable_withdrawn: f64,
    pub capital_gains_tax: f64,
    pub tax_deferred_withdrawn: f64,
    /// Paid out of the taxable account
    pub income_tax: f64,
    pub tax_exempt_withdrawn: f64,
}

impl YearFlows {
    pub fn total_withdrawn(&self) -> f64 {
        self.taxable_withdrawn + self.tax_deferred_withdrawn + self.tax_exempt_withdrawn
    }

    pub fn total_tax(&self) -> f64 {
        self.capital_gains_tax + self.income_tax
    }
}
