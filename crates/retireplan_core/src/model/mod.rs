mod accounts;
mod portfolio;
mod results;
mod tax_config;

pub use accounts::{Account, AccountKind, sample_growth_rate};
pub use portfolio::{Portfolio, PortfolioBalances};
pub use results::{MonteCarloResult, MonteCarloSummary, YearSnapshot};
pub use tax_config::{FilingStatus, TaxBracket, TaxTable};
