// scripts/option_lab.rs
//! `option-lab` command line
//!
//! - `option-lab price`       - value a call/put pair with Greeks
//! - `option-lab implied-vol` - back out σ from a quoted price
//! - `option-lab hedge`       - run the delta-hedging simulation
//! - `option-lab paths`       - simulate an ensemble of GBM paths
//! - `option-lab payoff`      - tabulate a payoff diagram
//! - `option-lab asian`       - Monte Carlo price of an arithmetic Asian option
//! - `option-lab smile`       - implied volatility smile from a chain CSV

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use option_lab::analytics::bs_analytic::{price, sensitivities, GreekSet, MarketSnapshot};
use option_lab::analytics::implied_vol::{implied_volatility, OptionKind};
use option_lab::config::LabConfig;
use option_lab::hedging::delta_hedge::{run_delta_hedge, tracking_error_study};
use option_lab::market::{fill_time_to_expiry, implied_vol_smile};
use option_lab::math_utils::Timer;
use option_lab::mc::asian::price_asian;
use option_lab::mc::paths::{ensemble_times, simulate_ensemble};
use option_lab::output;
use option_lab::payoffs::Payoff;
use option_lab::{LabError, LabResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "option-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (optional)
    #[arg(short, long, global = true, default_value = "option-lab.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Black-Scholes call and put valuation
    Price {
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        strike: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        sigma: f64,
        /// Time to expiry in years
        #[arg(long)]
        tau: f64,
        /// Comma separated Greeks to report (delta,vega,gamma,theta,rho,all)
        #[arg(long, default_value = "delta,vega")]
        greeks: String,
    },

    /// Implied volatility of a quoted option
    ImpliedVol {
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        strike: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        tau: f64,
        /// Quoted option price
        #[arg(long)]
        price: f64,
        /// Quote is for a put rather than a call
        #[arg(long)]
        put: bool,
    },

    /// Delta-hedge a call along one simulated path
    Hedge {
        #[arg(long)]
        seed: Option<u64>,
        /// Rebalancing interval
        #[arg(long)]
        dt: Option<f64>,
        /// Also report tracking error statistics over this many seeds
        #[arg(long)]
        study: Option<usize>,
        /// CSV output file, relative to `output_dir` (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate an ensemble of GBM paths
    Paths {
        #[arg(long)]
        paths: Option<usize>,
        #[arg(long)]
        steps: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tabulate a payoff diagram
    Payoff {
        /// long-call, long-put, short-call, short-put, bull, butterfly
        #[arg(long)]
        kind: String,
        /// Strike(s), comma separated
        #[arg(long, value_delimiter = ',', num_args = 1..=3)]
        strikes: Vec<f64>,
        #[arg(long)]
        min: f64,
        #[arg(long)]
        max: f64,
        #[arg(long, default_value_t = 1000)]
        points: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Monte Carlo price of an arithmetic-average Asian option
    Asian {
        #[arg(long)]
        spot: Option<f64>,
        #[arg(long)]
        strike: Option<f64>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        sigma: Option<f64>,
        /// Maturity in years
        #[arg(long)]
        tau: Option<f64>,
        #[arg(long)]
        paths: Option<usize>,
        /// Number of averaging dates
        #[arg(long)]
        steps: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Price the put rather than the call
        #[arg(long)]
        put: bool,
    },

    /// Implied volatility smile from an option chain CSV
    Smile {
        #[arg(long)]
        chain: PathBuf,
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        rate: f64,
        /// Valuation date (YYYY-MM-DD) for rows without T_years; defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> LabResult<()> {
    let cli = Cli::parse();
    let config = LabConfig::load_or_default(&cli.config)?.with_env_override()?;
    config.validate()?;

    let default_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level));
    let filter = filter.map_err(|e| LabError::Config(format!("invalid log level: {}", e)))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Price {
            spot,
            strike,
            rate,
            sigma,
            tau,
            greeks,
        } => {
            let snapshot = MarketSnapshot::new(spot, strike, rate, sigma, tau);
            let selected = GreekSet::parse_list(&greeks)?;
            let valuation = price(&snapshot)?;
            let extra = sensitivities(&snapshot)?;
            output::write_valuation(io::stdout().lock(), &snapshot, &valuation, &extra, selected)
        }

        Commands::ImpliedVol {
            spot,
            strike,
            rate,
            tau,
            price: quote,
            put,
        } => {
            let kind = if put { OptionKind::Put } else { OptionKind::Call };
            let snapshot = MarketSnapshot::new(spot, strike, rate, 0.0, tau);
            let iv = implied_volatility(&snapshot, quote, kind)?;
            println!("{:.6}", iv);
            Ok(())
        }

        Commands::Hedge {
            seed,
            dt,
            study,
            output: dest,
        } => {
            let mut cfg = config.hedge.clone();
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if let Some(dt) = dt {
                cfg.dt = dt;
            }

            let timer = Timer::new();
            let run = run_delta_hedge(&cfg)?;
            info!(
                samples = run.len(),
                tracking_error = run.tracking_error(),
                elapsed_ms = timer.elapsed_ms(),
                "hedge simulation finished"
            );

            if let Some(runs) = study {
                let stats = tracking_error_study(&cfg, runs)?;
                info!(
                    runs = stats.runs,
                    mean_abs = stats.mean_abs,
                    rms = stats.rms,
                    max_abs = stats.max_abs,
                    "tracking error study"
                );
            }

            with_output(&config.output_dir, dest.as_deref(), |w| output::write_hedge_run(w, &run))
        }

        Commands::Paths {
            paths,
            steps,
            seed,
            output: dest,
        } => {
            let mut cfg = config.paths.clone();
            cfg.paths = paths.unwrap_or(cfg.paths);
            cfg.steps = steps.unwrap_or(cfg.steps);
            cfg.seed = seed.unwrap_or(cfg.seed);

            let timer = Timer::new();
            let grid = simulate_ensemble(&cfg)?;
            info!(
                paths = cfg.paths,
                steps = cfg.steps,
                elapsed_ms = timer.elapsed_ms(),
                "paths simulated"
            );

            let times = ensemble_times(&cfg);
            with_output(&config.output_dir, dest.as_deref(), |w| output::write_paths(w, &times, &grid))
        }

        Commands::Payoff {
            kind,
            strikes,
            min,
            max,
            points,
            output: dest,
        } => {
            let payoff = Payoff::from_parts(&kind, &strikes)?;
            let (prices, values) = payoff.diagram(min, max, points)?;
            info!(payoff = payoff.name(), points, "payoff diagram");
            with_output(&config.output_dir, dest.as_deref(), |w| {
                output::write_payoff_diagram(w, &prices, &values)
            })
        }

        Commands::Asian {
            spot,
            strike,
            rate,
            sigma,
            tau,
            paths,
            steps,
            seed,
            put,
        } => {
            let mut cfg = config.asian.clone();
            cfg.s0 = spot.unwrap_or(cfg.s0);
            cfg.strike = strike.unwrap_or(cfg.strike);
            cfg.r = rate.unwrap_or(cfg.r);
            cfg.sigma = sigma.unwrap_or(cfg.sigma);
            cfg.t = tau.unwrap_or(cfg.t);
            cfg.paths = paths.unwrap_or(cfg.paths);
            cfg.steps = steps.unwrap_or(cfg.steps);
            cfg.seed = seed.unwrap_or(cfg.seed);
            if put {
                cfg.kind = OptionKind::Put;
            }

            let timer = Timer::new();
            let estimate = price_asian(&cfg)?;
            info!(
                paths = cfg.paths,
                steps = cfg.steps,
                elapsed_ms = timer.elapsed_ms(),
                "Asian option priced"
            );
            println!("{:.6} {:.6}", estimate.price, estimate.std_error);
            Ok(())
        }

        Commands::Smile {
            chain,
            spot,
            rate,
            today,
            output: dest,
        } => {
            let mut rows = output::read_option_chain(File::open(&chain)?)?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            fill_time_to_expiry(&mut rows, today);
            let smile = implied_vol_smile(&rows, spot, rate);
            info!(quotes = rows.len(), points = smile.len(), "implied volatility smile");
            with_output(&config.output_dir, dest.as_deref(), |w| output::write_smile(w, &smile))
        }
    }
}

/// Route CSV output to a file under `output_dir`, or to stdout.
/// Absolute paths are used as given.
fn with_output<F>(output_dir: &Path, path: Option<&Path>, write: F) -> LabResult<()>
where
    F: FnOnce(Box<dyn Write>) -> LabResult<()>,
{
    match path {
        Some(path) => {
            let path = output_dir.join(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            info!("writing {}", path.display());
            write(Box::new(BufWriter::new(File::create(&path)?)))
        }
        None => write(Box::new(io::stdout().lock())),
    }
}
