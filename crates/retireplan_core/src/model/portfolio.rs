use serde::{Deserialize, Serialize};

use super::accounts::{Account, AccountKind};

/// Starting balances, the shape used in scenario files
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioBalances {
    pub taxable: f64,
    pub tax_deferred: f64,
    pub tax_exempt: f64,
}

/// Exactly one account of each kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PortfolioBalances", into = "PortfolioBalances")]
pub struct Portfolio {
    taxable: Account,
    tax_deferred: Account,
    tax_exempt: Account,
}

impl Portfolio {
    #[must_use]
    pub fn new(taxable: f64, tax_deferred: f64, tax_exempt: f64) -> Self {
        Self {
            taxable: Account::new(AccountKind::Taxable, taxable),
            tax_deferred: Account::new(AccountKind::TaxDeferred, tax_deferred),
            tax_exempt: Account::new(AccountKind::TaxExempt, tax_exempt),
        }
    }

    pub fn account(&self, kind: AccountKind) -> &Account {
        match kind {
            AccountKind::Taxable => &self.taxable,
            AccountKind::TaxDeferred => &self.tax_deferred,
            AccountKind::TaxExempt => &self.tax_exempt,
        }
    }

    pub fn account_mut(&mut self, kind: AccountKind) -> &mut Account {
        match kind {
            AccountKind::Taxable => &mut self.taxable,
            AccountKind::TaxDeferred => &mut self.tax_deferred,
            AccountKind::TaxExempt => &mut self.tax_exempt,
        }
    }

    pub fn taxable(&self) -> &Account {
        &self.taxable
    }

    pub fn tax_deferred(&self) -> &Account {
        &self.tax_deferred
    }

    pub fn tax_exempt(&self) -> &Account {
        &self.tax_exempt
    }

    /// Accounts in taxable, tax-deferred, tax-exempt order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        [&self.taxable, &self.tax_deferred, &self.tax_exempt].into_iter()
    }

    pub fn total_balance(&self) -> f64 {
        self.taxable.balance + self.tax_deferred.balance + self.tax_exempt.balance
    }

    /// Floor every balance at exactly zero
    pub fn reset_to_zero(&mut self) {
        for kind in AccountKind::ALL {
            self.account_mut(kind).balance = 0.0;
        }
    }

    pub fn balances(&self) -> PortfolioBalances {
        PortfolioBalances {
            taxable: self.taxable.balance,
            tax_deferred: self.tax_deferred.balance,
            tax_exempt: self.tax_exempt.balance,
        }
    }
}

impl From<PortfolioBalances> for Portfolio {
    fn from(b: PortfolioBalances) -> Self {
        Portfolio::new(b.taxable, b.tax_deferred, b.tax_exempt)
    }
}

impl From<Portfolio> for PortfolioBalances {
    fn from(p: Portfolio) -> Self {
        p.balances()
    }
}
