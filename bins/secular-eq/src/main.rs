//! secular-eq: Secular equilibrium calculator.
//!
//! Back-calculates ancestor activities and masses from a measured progeny
//! activity, either for a single case given on the command line or for a
//! CSV batch.

mod batch;
mod report;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use secular_chain::config::ChainConfig;
use secular_chain::EquilibriumCalculator;
use secular_core::constants::MAX_DEPTH;
use secular_core::traits::NuclideData;
use secular_core::types::CalculationRequest;
use secular_data::NuclideTable;
use tracing::{debug, info};

use crate::batch::BatchOptions;

/// Secular equilibrium calculator.
#[derive(Parser, Debug)]
#[command(
    name = "secular-eq",
    version,
    about = "Secular equilibrium calculator",
    after_help = "Examples:
  secular-eq --measured Pb-214 --activity 100 --parents U-238 Ra-226
  secular-eq -m Pb-214 -a 100 -p U-238 --activity-unc 5
  secular-eq -m Ra-223 -a 100 -p Ac-227 --explain-paths
  secular-eq --input-csv batch_inputs.csv --output-csv batch_outputs.csv"
)]
struct Args {
    /// Measured nuclide (e.g. Pb-214, Bi-214, Tl-208)
    #[arg(short, long)]
    measured: Option<String>,

    /// Measured activity in Bq
    #[arg(short, long, allow_negative_numbers = true)]
    activity: Option<f64>,

    /// Parent nuclides (e.g. U-238 Ra-226)
    #[arg(short, long, num_args = 1..)]
    parents: Vec<String>,

    /// Decay type to consider: α, β-, β+, EC, SF, IT, p, n, d, t.
    ///
    /// Shorthand: a/alpha for α, b/beta for β-, b+/beta+ for β+, e/ec for
    /// EC. All decay types are considered when omitted.
    #[arg(short, long)]
    decay_type: Option<String>,

    /// Measured activity uncertainty (1 sigma, Bq)
    #[arg(long, allow_negative_numbers = true)]
    activity_unc: Option<f64>,

    /// Include every decay path and its contribution
    #[arg(long)]
    explain_paths: bool,

    /// Batch input CSV.
    ///
    /// Required columns: measured_nuclide, measured_activity,
    /// parent_nuclides. Optional: decay_type, measured_activity_uncertainty.
    #[arg(long)]
    input_csv: Option<PathBuf>,

    /// Batch output CSV (stdout when omitted)
    #[arg(long)]
    output_csv: Option<PathBuf>,

    /// Print key numeric results only
    #[arg(short, long)]
    quiet: bool,

    /// Print only masses in grams, in parent order
    #[arg(long)]
    mass_only: bool,

    /// Nuclide dataset JSON (bundled natural series when omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Maximum decay steps followed from a parent
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// How single-mode results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Report,
    Quiet,
    MassOnly,
}

#[derive(Debug, PartialEq)]
enum Mode {
    Single {
        request: CalculationRequest,
        output: Output,
    },
    Batch {
        input: PathBuf,
        output: Option<PathBuf>,
        explain_paths: bool,
    },
}

#[derive(Debug, PartialEq)]
struct RunConfig {
    mode: Mode,
    data: Option<PathBuf>,
    chain: ChainConfig,
}

impl Args {
    /// Check flag combinations and convert into a RunConfig.
    fn into_config(self) -> Result<RunConfig> {
        let chain = ChainConfig::with_max_depth(self.max_depth);

        let mode = if let Some(input) = self.input_csv {
            if self.mass_only {
                bail!("--mass-only is not supported in batch mode");
            }
            if self.measured.is_some() || self.activity.is_some() || !self.parents.is_empty() {
                bail!("--input-csv cannot be combined with --measured/--activity/--parents");
            }
            Mode::Batch {
                input,
                output: self.output_csv,
                explain_paths: self.explain_paths,
            }
        } else {
            if self.output_csv.is_some() {
                bail!("--output-csv requires --input-csv");
            }

            let mut missing = Vec::new();
            if self.measured.is_none() {
                missing.push("--measured");
            }
            if self.activity.is_none() {
                missing.push("--activity");
            }
            if self.parents.is_empty() {
                missing.push("--parents");
            }
            let (Some(measured), Some(activity)) = (self.measured, self.activity) else {
                bail!("single-case mode requires: {}", missing.join(", "));
            };
            if !missing.is_empty() {
                bail!("single-case mode requires: {}", missing.join(", "));
            }

            let mut request =
                CalculationRequest::new(measured, activity, self.parents).with_paths(self.explain_paths);
            if let Some(decay_type) = self.decay_type {
                request = request.with_decay_type(decay_type);
            }
            if let Some(sigma) = self.activity_unc {
                request = request.with_uncertainty(sigma);
            }

            let output = if self.mass_only {
                Output::MassOnly
            } else if self.quiet {
                Output::Quiet
            } else {
                Output::Report
            };
            Mode::Single { request, output }
        };

        Ok(RunConfig {
            mode,
            data: self.data,
            chain,
        })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_format);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a batch completed with failed rows or parents.
fn run(config: RunConfig) -> Result<bool> {
    let data = load_data(config.data.as_deref())?;
    debug!(max_depth = config.chain.max_depth, "configuration loaded");

    match config.mode {
        Mode::Single { request, output } => {
            run_single(data, request, output, config.chain)?;
            Ok(true)
        }
        Mode::Batch {
            input,
            output,
            explain_paths,
        } => {
            let opts = BatchOptions {
                data,
                chain: config.chain,
                explain_paths,
            };
            run_batch(&input, output.as_deref(), &opts)
        }
    }
}

fn load_data(path: Option<&Path>) -> Result<Arc<dyn NuclideData>> {
    let table = match path {
        Some(path) => NuclideTable::from_path(path)
            .with_context(|| format!("failed to load nuclide data from {}", path.display()))?,
        None => NuclideTable::natural_series().context("failed to load bundled nuclide data")?,
    };
    info!(nuclides = table.len(), "nuclide data ready");
    Ok(Arc::new(table))
}

fn run_single(
    data: Arc<dyn NuclideData>,
    request: CalculationRequest,
    output: Output,
    chain: ChainConfig,
) -> Result<()> {
    let with_uncertainty = request.measured_activity_uncertainty.is_some();
    let mut calc = EquilibriumCalculator::with_config(data, request, chain)?;
    let reports = calc.calculate()?;

    match output {
        Output::Report => print!("{}", report::human_report(&calc, &reports)),
        Output::Quiet => println!("{}", report::quiet_line(&reports, with_uncertainty)),
        Output::MassOnly => println!("{}", report::mass_only_line(&reports)),
    }
    Ok(())
}

fn run_batch(input: &Path, output: Option<&Path>, opts: &BatchOptions) -> Result<bool> {
    let file = File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let (rows, had_errors) = batch::process(BufReader::new(file), opts)
        .with_context(|| format!("failed to process {}", input.display()))?;
    info!(rows = rows.len(), had_errors, "batch evaluated");

    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            batch::write_rows(BufWriter::new(file), &rows)?;
        }
        None => batch::write_rows(io::stdout().lock(), &rows)?,
    }
    Ok(!had_errors)
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so stdout carries only results. `RUST_LOG` overrides
/// `level_str`.
fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .init(),
    }
}
