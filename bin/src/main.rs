//! Faro CLI binary.
//!
//! Command-line front end for the faro factor research engine: CSV panels in,
//! CSV tables, JSON summaries and text reports out.

mod cmd;
mod data;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use faro::ResearchConfig;

#[derive(Parser)]
#[command(name = "faro")]
#[command(about = "Cross-sectional equity factor evaluation and backtesting", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON research configuration; defaults apply to absent fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Flag overrides applied on top of the configuration file.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Factors to build and evaluate
    #[arg(long, global = true, value_delimiter = ',')]
    factors: Option<Vec<String>>,

    /// Forward-return horizons in trading days
    #[arg(long, global = true, value_delimiter = ',')]
    horizons: Option<Vec<usize>>,

    /// Number of quantile buckets
    #[arg(short, long, global = true)]
    quantiles: Option<usize>,

    /// Round-trip transaction cost in basis points
    #[arg(long, global = true)]
    cost_bps: Option<f64>,

    /// Rebalance cadence in trading days
    #[arg(long, global = true)]
    rebalance_every: Option<usize>,

    /// Factor traded by the backtest
    #[arg(long, global = true)]
    backtest_factor: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut ResearchConfig) {
        if let Some(factors) = self.factors {
            config.factors = factors;
        }
        if let Some(horizons) = self.horizons {
            config.horizons = horizons;
        }
        if let Some(quantiles) = self.quantiles {
            config.quantiles = quantiles;
        }
        if let Some(cost) = self.cost_bps {
            config.cost_bps_roundtrip = cost;
        }
        if let Some(k) = self.rebalance_every {
            config.rebalance_every = k;
        }
        if let Some(factor) = self.backtest_factor {
            config.backtest_factor = factor;
        }
    }
}

/// Input panel shared by the data-driven subcommands.
#[derive(Args, Debug)]
struct InputArgs {
    /// Long-format CSV panel with `date` and `ticker` columns
    #[arg(short, long)]
    input: PathBuf,

    /// The input already went through `faro prepare`
    #[arg(long)]
    prepared: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available factors
    Factors {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Attach labels, build factors, filter and normalize a raw panel
    Prepare {
        #[command(flatten)]
        input: InputArgs,

        /// Output CSV for the prepared panel
        #[arg(short, long)]
        output: PathBuf,
    },

    /// IC summary, decay and quantile-spread tables
    Eval {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for the output tables
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
    },

    /// Backtest the configured factor
    Backtest {
        #[command(flatten)]
        input: InputArgs,

        /// Output CSV for the trajectory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Backtest performance across transaction costs
    Sensitivity {
        #[command(flatten)]
        input: InputArgs,

        /// Round-trip costs in basis points
        #[arg(long, value_delimiter = ',')]
        costs: Option<Vec<f64>>,

        /// Output CSV for the sensitivity table
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Prepare, evaluate, backtest and sweep costs
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for every output table
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,

        /// Round-trip costs in basis points
        #[arg(long, value_delimiter = ',')]
        costs: Option<Vec<f64>>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>, overrides: Overrides) -> Result<ResearchConfig> {
    let mut config = match path {
        Some(path) => ResearchConfig::from_json_file(path)?,
        None => ResearchConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Factors { category, verbose } = &cli.command {
        return cmd::factors::list_factors(category.as_deref(), *verbose);
    }

    let config = load_config(cli.config.as_ref(), cli.overrides)?;

    match cli.command {
        Commands::Factors { .. } => Ok(()),
        Commands::Prepare { input, output } => cmd::prepare::prepare_panel(config, &input, &output),
        Commands::Eval { input, out_dir } => cmd::eval::evaluate_factors(config, &input, &out_dir),
        Commands::Backtest {
            input,
            output,
            format,
        } => cmd::backtest::run_backtest(config, &input, output.as_deref(), &format),
        Commands::Sensitivity {
            input,
            costs,
            output,
        } => cmd::sensitivity::sweep_costs(config, &input, costs.as_deref(), output.as_deref()),
        Commands::Run {
            input,
            out_dir,
            costs,
        } => cmd::run::run_all(config, &input, &out_dir, costs.as_deref()),
    }
}
