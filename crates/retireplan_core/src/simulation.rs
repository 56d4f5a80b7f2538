use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{MonteCarloConfig, SimulationConfig, TrialFailurePolicy};
use crate::error::{Result, SimulationError};
use crate::model::{AccountKind, MonteCarloResult, Portfolio, TaxTable, YearSnapshot};
use crate::simulation_state::{SimulationState, YearFlows};

/// Apply one simulated year to `state`: contribute, grow, then withdraw.
///
/// Withdrawals happen only from `retirement_age` on and always drain the
/// taxable account first, then tax-deferred, then tax-exempt. Capital gains
/// tax and the income tax on tax-deferred withdrawals are both paid from the
/// taxable account.
pub fn run_single_year<R: Rng + ?Sized>(
    state: &mut SimulationState,
    config: &SimulationConfig,
    tax_table: &TaxTable,
    rng: &mut R,
) -> Result<YearFlows> {
    let mut flows = YearFlows::default();
    let retired = config.is_retired_at(state.age);
    let portfolio = &mut state.portfolio;

    if !retired {
        portfolio
            .account_mut(AccountKind::TaxDeferred)
            .deposit(config.annual_contribution);
        flows.contribution = config.annual_contribution;
    }

    for kind in AccountKind::ALL {
        portfolio.account_mut(kind).project_growth(
            config.investment_return,
            config.investment_std_dev,
            rng,
        )?;
    }

    if retired {
        withdraw_for_expenses(portfolio, state.expenses, config, tax_table, &mut flows)?;
        tracing::trace!(
            age = state.age,
            withdrawn = flows.total_withdrawn(),
            tax = flows.total_tax(),
            "year withdrawals"
        );
    }

    Ok(flows)
}

fn withdraw_for_expenses(
    portfolio: &mut Portfolio,
    expenses: f64,
    config: &SimulationConfig,
    tax_table: &TaxTable,
    flows: &mut YearFlows,
) -> Result<()> {
    let mut needed = expenses;

    let taxable = portfolio.account_mut(AccountKind::Taxable);
    let withdrawn = needed.min(taxable.balance);
    if withdrawn > 0.0 {
        taxable.withdraw(withdrawn)?;
        needed -= withdrawn;
        // Not clamped: fails if the principal emptied the account
        let gains_tax = tax_table.capital_gains_tax(withdrawn);
        taxable.withdraw(gains_tax)?;
        flows.taxable_withdrawn = withdrawn;
        flows.capital_gains_tax = gains_tax;
    }

    let deferred_balance = portfolio.tax_deferred().balance;
    if needed > 0.0 && deferred_balance > 0.0 {
        let withdrawn = needed.min(deferred_balance);
        portfolio
            .account_mut(AccountKind::TaxDeferred)
            .withdraw(withdrawn)?;
        needed -= withdrawn;
        let income_tax = tax_table.income_tax(withdrawn, &config.filing_status)?;
        portfolio
            .account_mut(AccountKind::Taxable)
            .withdraw(income_tax)?;
        flows.tax_deferred_withdrawn = withdrawn;
        flows.income_tax = income_tax;
    }

    let exempt_balance = portfolio.tax_exempt().balance;
    if needed > 0.0 && exempt_balance > 0.0 {
        let withdrawn = needed.min(exempt_balance);
        portfolio
            .account_mut(AccountKind::TaxExempt)
            .withdraw(withdrawn)?;
        flows.tax_exempt_withdrawn = withdrawn;
    }

    // Whatever is still needed goes unmet
    Ok(())
}

/// Single pass with randomness disabled, recording every age.
pub fn simulate_deterministic(
    portfolio: &Portfolio,
    config: &SimulationConfig,
    tax_table: &TaxTable,
) -> Result<Vec<YearSnapshot>> {
    let config = config.deterministic();
    // Never sampled: std dev is zero
    let mut rng = SmallRng::seed_from_u64(0);
    let mut state = SimulationState::from_parameters(portfolio, &config);
    let mut snapshots = Vec::with_capacity(config.simulated_years());

    tracing::debug!(
        current_age = config.current_age,
        end_age = config.end_age,
        "starting deterministic projection"
    );

    for _ in config.ages() {
        if state.portfolio.total_balance() < 0.0 {
            state.portfolio.reset_to_zero();
        }

        run_single_year(&mut state, &config, tax_table, &mut rng)?;
        snapshots.push(YearSnapshot::capture(
            state.age,
            state.expenses,
            &state.portfolio,
        ));
        state.advance_year(config.inflation_rate);
    }

    tracing::debug!(
        years = snapshots.len(),
        final_total = snapshots.last().map(|s| s.total),
        "deterministic projection finished"
    );
    Ok(snapshots)
}

/// Run one stochastic trial and return its terminal total balance.
///
/// The trial stops early once the portfolio total is no longer positive at the
/// start of a year.
pub fn simulate_trial(
    portfolio: &Portfolio,
    config: &SimulationConfig,
    tax_table: &TaxTable,
    seed: u64,
) -> Result<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = SimulationState::from_parameters(portfolio, config);

    for _ in config.ages() {
        if state.portfolio.total_balance() <= 0.0 {
            break;
        }
        run_single_year(&mut state, config, tax_table, &mut rng)?;
        state.advance_year(config.inflation_rate);
    }

    Ok(state.portfolio.total_balance())
}

const MAX_BATCH_SIZE: usize = 100;

pub(crate) fn batch_seed(base_seed: u64, batch: usize) -> u64 {
    base_seed ^ (batch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Many independent stochastic trials aggregated into a success rate.
///
/// Trials are split into fixed batches; each batch owns a generator seeded
/// from the base seed and hands every trial its own seed. With a fixed
/// `seed` the result is reproducible whether or not batches run in parallel.
pub fn monte_carlo_simulate(
    portfolio: &Portfolio,
    config: &SimulationConfig,
    tax_table: &TaxTable,
    mc_config: &MonteCarloConfig,
) -> Result<MonteCarloResult> {
    let num_iterations = mc_config.iterations;
    if num_iterations == 0 {
        return Ok(MonteCarloResult::from_final_balances(Vec::new(), 0));
    }

    let base_seed = mc_config.seed.unwrap_or_else(|| rand::rng().random());
    let num_batches = num_iterations.div_ceil(MAX_BATCH_SIZE);

    tracing::debug!(
        iterations = num_iterations,
        batches = num_batches,
        base_seed,
        "starting Monte Carlo run"
    );

    let run_batch = |i: usize| {
        let mut rng = SmallRng::seed_from_u64(batch_seed(base_seed, i));

        let batch_size = if i == num_batches - 1 {
            num_iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        (0..batch_size)
            .map(|_| {
                let seed = rng.next_u64();
                simulate_trial(portfolio, config, tax_table, seed)
            })
            .collect::<Vec<_>>()
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<f64>> = (0..num_batches)
        .into_par_iter()
        .flat_map_iter(run_batch)
        .collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<f64>> = (0..num_batches).flat_map(run_batch).collect();

    let mut final_balances = Vec::with_capacity(num_iterations);
    let mut failed_trials = 0;
    for (trial, outcome) in outcomes.into_iter().enumerate() {
        match (outcome, mc_config.failure_policy) {
            (Ok(balance), _) => final_balances.push(balance),
            (Err(err), TrialFailurePolicy::Abort) => {
                return Err(SimulationError::TrialFailed {
                    trial,
                    source: Box::new(err),
                });
            }
            (Err(err), TrialFailurePolicy::RecordAsFailure) => {
                tracing::warn!(trial, error = %err, "trial failed, recorded as depleted");
                failed_trials += 1;
                final_balances.push(0.0);
            }
        }
    }

    let result = MonteCarloResult::from_final_balances(final_balances, failed_trials);
    tracing::debug!(
        success_rate = result.success_rate,
        failed_trials,
        "Monte Carlo run finished"
    );
    Ok(result)
}

/// Runs projections against a fixed portfolio and configuration.
///
/// The templates are only ever read; every run works on its own copy.
#[derive(Debug, Clone)]
pub struct RetirementSimulator {
    portfolio: Portfolio,
    config: SimulationConfig,
    tax_table: TaxTable,
}

impl RetirementSimulator {
    /// Simulator using the built-in German 2025 tax table
    #[must_use]
    pub fn new(portfolio: Portfolio, config: SimulationConfig) -> Self {
        Self {
            portfolio,
            config,
            tax_table: TaxTable::default(),
        }
    }

    #[must_use]
    pub fn with_tax_table(mut self, tax_table: TaxTable) -> Self {
        self.tax_table = tax_table;
        self
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tax_table(&self) -> &TaxTable {
        &self.tax_table
    }

    /// Fresh working state at `current_age`
    pub fn initial_state(&self) -> SimulationState {
        SimulationState::from_parameters(&self.portfolio, &self.config)
    }

    /// Apply one year of the configured plan to `state`
    pub fn run_year<R: Rng + ?Sized>(
        &self,
        state: &mut SimulationState,
        rng: &mut R,
    ) -> Result<YearFlows> {
        run_single_year(state, &self.config, &self.tax_table, rng)
    }

    pub fn run_deterministic(&self) -> Result<Vec<YearSnapshot>> {
        simulate_deterministic(&self.portfolio, &self.config, &self.tax_table)
    }

    pub fn run_monte_carlo(&self, mc_config: &MonteCarloConfig) -> Result<MonteCarloResult> {
        monte_carlo_simulate(&self.portfolio, &self.config, &self.tax_table, mc_config)
    }
}
