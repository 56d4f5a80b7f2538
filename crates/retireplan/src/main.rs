use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use retireplan::report::{self, RealTerms};
use retireplan::{Scenario, init_logging};
use retireplan_core::{MonteCarloConfig, TrialFailurePolicy};

#[derive(Parser, Debug)]
#[command(name = "retireplan")]
#[command(about = "Project retirement savings across taxable, tax-deferred and tax-exempt accounts")]
struct Args {
    /// Scenario file (default: built-in reference scenario)
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    /// Path to the data directory (default: ~/.retireplan/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Year-by-year projection with fixed returns
    Project {
        /// Add a column with totals in first-year money
        #[arg(long)]
        real: bool,
    },
    /// Success rate over many randomized trials
    MonteCarlo {
        #[arg(short = 'n', long, default_value_t = 1000)]
        iterations: usize,

        /// Base seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Count failing trials as depleted instead of aborting
        #[arg(long)]
        record_failures: bool,
    },
    /// Write the reference scenario to a file as a starting point
    Init { path: PathBuf },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".retireplan")
}

fn load_scenario(path: Option<&Path>) -> color_eyre::Result<Scenario> {
    let scenario = match path {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    scenario.validate()?;
    Ok(scenario)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    match args.command {
        Command::Init { path } => {
            Scenario::default().save(&path)?;
            tracing::info!(path = %path.display(), "wrote reference scenario");
            println!("Wrote {}", path.display());
        }
        Command::Project { real } => {
            let scenario = load_scenario(args.scenario.as_deref())?;
            let snapshots = scenario.simulator().run_deterministic()?;
            tracing::info!(years = snapshots.len(), "projection complete");

            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else {
                let terms = real.then_some(RealTerms {
                    start_age: scenario.config.current_age,
                    inflation_rate: scenario.config.inflation_rate,
                });
                print!("{}", report::render_trajectory(&snapshots, terms));
            }
        }
        Command::MonteCarlo {
            iterations,
            seed,
            record_failures,
        } => {
            let scenario = load_scenario(args.scenario.as_deref())?;
            let mut mc = MonteCarloConfig::new(iterations);
            if let Some(seed) = seed {
                mc = mc.with_seed(seed);
            }
            if record_failures {
                mc = mc.with_failure_policy(TrialFailurePolicy::RecordAsFailure);
            }

            let result = scenario.simulator().run_monte_carlo(&mc)?;
            let summary = result.summary();
            tracing::info!(
                iterations,
                success_rate = summary.success_rate,
                "Monte Carlo run complete"
            );

            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_monte_carlo(&summary));
            }
        }
    }

    tracing::info!("retireplan exiting");
    Ok(())
}
