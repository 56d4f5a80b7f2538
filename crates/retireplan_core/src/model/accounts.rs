use std::fmt;

use rand::{Rng, distr::Distribution};
use serde::{Deserialize, Serialize};

use crate::error::{AccountError, MarketError};

/// Tax treatment of an account. Behavior is identical across kinds; the
/// simulator uses the kind to pick withdrawal order and which tax applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Taxable,
    TaxDeferred, // Traditional pension / 401k
    TaxExempt,   // Roth-style
}

impl AccountKind {
    /// Fixed iteration order used for growth and reporting
    pub const ALL: [AccountKind; 3] = [
        AccountKind::Taxable,
        AccountKind::TaxDeferred,
        AccountKind::TaxExempt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Taxable => "taxable",
            AccountKind::TaxDeferred => "tax-deferred",
            AccountKind::TaxExempt => "tax-exempt",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single balance-holding account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub kind: AccountKind,
    /// Signed on purpose: adverse growth draws may push it below zero
    pub balance: f64,
}

impl Account {
    #[must_use]
    pub fn new(kind: AccountKind, balance: f64) -> Self {
        Self { kind, balance }
    }

    /// Add `amount` to the balance. The sign is not checked.
    pub fn deposit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// Remove `amount` from the balance, failing if it exceeds the current balance
    pub fn withdraw(&mut self, amount: f64) -> Result<(), AccountError> {
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                kind: self.kind,
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Grow the balance by one period and return the rate that was applied.
    ///
    /// With `std_dev > 0` a fresh rate is drawn from `Normal(rate, std_dev)`;
    /// otherwise `rate` is used as-is and `rng` is left untouched.
    pub fn project_growth<R: Rng + ?Sized>(
        &mut self,
        rate: f64,
        std_dev: f64,
        rng: &mut R,
    ) -> Result<f64, MarketError> {
        let growth = sample_growth_rate(rate, std_dev, rng)?;
        self.balance *= 1.0 + growth;
        Ok(growth)
    }
}

/// Draw a single period growth rate.
pub fn sample_growth_rate<R: Rng + ?Sized>(
    rate: f64,
    std_dev: f64,
    rng: &mut R,
) -> Result<f64, MarketError> {
    let invalid = || MarketError::InvalidDistributionParameters {
        mean: rate,
        std_dev,
        reason: "std_dev must be finite",
    };

    // Normal::new accepts an infinite std dev, so check it here
    if !std_dev.is_finite() {
        return Err(invalid());
    }
    if std_dev > 0.0 {
        rand_distr::Normal::new(rate, std_dev)
            .map(|d| d.sample(rng))
            .map_err(|_| invalid())
    } else {
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_deposit_and_withdraw() {
        let mut account = Account::new(AccountKind::Taxable, 1_000.0);
        account.deposit(500.0);
        assert_eq!(account.balance, 1_500.0);

        account.withdraw(1_500.0).unwrap();
        assert_eq!(account.balance, 0.0);
    }

    #[test]
    fn test_withdraw_more_than_balance_fails() {
        let mut account = Account::new(AccountKind::TaxExempt, 1_000.0);
        let err = account.withdraw(1_200.0).unwrap_err();

        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                kind: AccountKind::TaxExempt,
                requested: 1_200.0,
                available: 1_000.0,
            }
        );
        // Failed withdrawal leaves the balance alone
        assert_eq!(account.balance, 1_000.0);
    }

    #[test]
    fn test_withdraw_from_negative_balance_fails() {
        let mut account = Account::new(AccountKind::Taxable, -10.0);
        assert!(account.withdraw(0.0).is_err());
    }

    #[test]
    fn test_fixed_growth_ignores_rng() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut reference = SmallRng::seed_from_u64(7);
        let mut account = Account::new(AccountKind::TaxDeferred, 10_000.0);

        let applied = account.project_growth(0.07, 0.0, &mut rng).unwrap();

        assert_eq!(applied, 0.07);
        assert!((account.balance - 10_700.0).abs() < 1e-9);
        // No draw consumed
        assert_eq!(rng.random::<u64>(), reference.random::<u64>());
    }

    #[test]
    fn test_stochastic_growth_is_seed_reproducible() {
        let mut a = Account::new(AccountKind::Taxable, 10_000.0);
        let mut b = a.clone();

        let rate_a = a
            .project_growth(0.07, 0.15, &mut SmallRng::seed_from_u64(42))
            .unwrap();
        let rate_b = b
            .project_growth(0.07, 0.15, &mut SmallRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(rate_a, rate_b);
        assert_eq!(a.balance, b.balance);
        assert!((a.balance - 10_000.0 * (1.0 + rate_a)).abs() < 1e-6);
    }

    #[test]
    fn test_growth_draws_vary_between_calls() {
        let mut rng = SmallRng::seed_from_u64(1);
        let draws: Vec<f64> = (0..5)
            .map(|_| sample_growth_rate(0.05, 0.2, &mut rng).unwrap())
            .collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_infinite_std_dev_is_rejected() {
        let mut account = Account::new(AccountKind::Taxable, 100.0);
        let result = account.project_growth(0.05, f64::INFINITY, &mut SmallRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(MarketError::InvalidDistributionParameters { .. })
        ));
        assert_eq!(account.balance, 100.0);
    }

    #[test]
    fn test_nan_std_dev_is_rejected() {
        let err = sample_growth_rate(0.05, f64::NAN, &mut SmallRng::seed_from_u64(0)).unwrap_err();
        match err {
            MarketError::InvalidDistributionParameters { mean, reason, .. } => {
                assert_eq!(mean, 0.05);
                assert_eq!(reason, "std_dev must be finite");
            }
        }
    }
}
