//! Twinveil CLI
//!
//! Command-line interface for the Twinveil dual-curve stealth address protocol.
//! Request commands read one JSON object (from `--input` or stdin) and write one
//! JSON object to stdout. Status lines and logs go to stderr.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use twinveil_api::{Api, ApiConfig, ApiError, Operation};
use twinveil_core::types::ScanCandidate;
use twinveil_crypto::ViewTagScheme;
use twinveil_scanner::{ProgressCallback, Scanner, ScannerConfig, ScanSummary};
use twinveil_stealth::decoy::random_candidates;
use twinveil_stealth::payment::SendPayloadBuilder;
use twinveil_stealth::wallet::generate_meta_address;

/// Twinveil - Dual-Curve Stealth Address Protocol
#[derive(Parser)]
#[command(name = "twinveil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// View tag scheme: v1-<N>byte, v0-<N>bytes or none
    #[arg(long, global = true, env = "TWINVEIL_VIEW_TAG_SCHEME")]
    view_tag_scheme: Option<ViewTagScheme>,

    /// Scan sequentially
    #[arg(long, global = true)]
    no_parallel: bool,

    /// Omit the ephemeral scalar `r` from send output
    #[arg(long, global = true)]
    hide_ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new secrets and meta-address
    Generate {
        /// Output file for keys (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recompute a meta-address from {"k", "v"}
    Recompute {
        /// Request file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Create a send payload from {"K", "V"}
    Send {
        /// Request file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Scan {"k", "v", "Rs", "viewTags"} for payments
    Scan {
        /// Request file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Validate {"curve", "point"}
    Validate {
        /// Request file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Run a scan benchmark
    Bench {
        /// Number of candidates to generate
        #[arg(short, long, default_value = "10000")]
        count: usize,
        /// Every Nth candidate is addressed to us
        #[arg(short, long, default_value = "100")]
        every: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "twinveil=debug,info"
    } else {
        "twinveil=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn load_config(cli: &Cli) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("Invalid configuration")?;
    if let Some(scheme) = cli.view_tag_scheme {
        config = config.with_view_tag_scheme(scheme);
    }
    if cli.no_parallel {
        config = config.with_parallel_scan(false);
    }
    if cli.hide_ephemeral {
        config = config.with_expose_ephemeral(false);
    }
    debug!(?config, "Loaded configuration");
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let api = Api::new(config);

    match cli.command {
        Commands::Generate { output } => cmd_generate(&api, output.as_deref()),
        Commands::Recompute { input } => cmd_request(&api, Operation::Recompute, input.as_deref()),
        Commands::Send { input } => cmd_request(&api, Operation::Send, input.as_deref()),
        Commands::Scan { input } => cmd_request(&api, Operation::Scan, input.as_deref()),
        Commands::Validate { input } => cmd_request(&api, Operation::Validate, input.as_deref()),
        Commands::Bench { count, every } => {
            cmd_bench(api.config(), count, every)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Generate new keys
fn cmd_generate(api: &Api, output: Option<&Path>) -> Result<ExitCode> {
    eprintln!("{}", "Generating Twinveil keys...".cyan().bold());

    let keys = match api.handle_json(Operation::Generate, Value::Null) {
        Ok(keys) => keys,
        Err(err) => return emit_error(err),
    };

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&keys)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{} {}", "Keys saved to:".green(), path.display());
    } else {
        emit(&keys)?;
    }

    eprintln!("{}", "IMPORTANT: Keep k and v secret.".red().bold());
    Ok(ExitCode::SUCCESS)
}

/// Run one JSON request through the API
fn cmd_request(api: &Api, op: Operation, input: Option<&Path>) -> Result<ExitCode> {
    let raw = read_input(input)?;
    let request: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => return emit_error(ApiError::from(err)),
    };

    match api.handle_json(op, request) {
        Ok(response) => {
            emit(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => emit_error(err),
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read request from stdin")?;
            Ok(raw)
        }
    }
}

fn emit(value: &Value) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn emit_error(err: ApiError) -> Result<ExitCode> {
    eprintln!("{} {}", "error:".red().bold(), err);
    emit(&serde_json::to_value(err.into_response())?)?;
    Ok(ExitCode::FAILURE)
}

fn bar(len: u64, template: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Run benchmarks
fn cmd_bench(config: &ApiConfig, count: usize, every: usize) -> Result<()> {
    let every = every.max(1);
    let scheme = config.view_tag_scheme;
    eprintln!(
        "{} {} candidates ({})",
        "Benchmarking with".cyan().bold(),
        count,
        scheme
    );

    eprintln!("\n{}", "1. Generating keys...".dimmed());
    let start = Instant::now();
    let (keys, meta) = generate_meta_address().context("Key generation failed")?;
    eprintln!("   Key generation: {:?}", start.elapsed());

    eprintln!("\n{}", "2. Creating candidates...".dimmed());
    let pb = bar(count as u64, "   [{bar:40.cyan/blue}] {pos}/{len}")?;
    let mut rng = rand::rngs::OsRng;
    let start = Instant::now();
    let mut candidates: Vec<ScanCandidate> = Vec::with_capacity(count);
    let mut ours = 0usize;
    for i in 0..count {
        if i % every == 0 {
            let payload = SendPayloadBuilder::new()
                .recipient(meta.clone())
                .view_tag_scheme(scheme)
                .build_with_rng(&mut rng)
                .context("Failed to create payload")?;
            candidates.push(payload.to_candidate());
            ours += 1;
        } else {
            candidates.extend(random_candidates(1, scheme, &mut rng).context("Failed to create decoy")?);
        }
        pb.inc(1);
    }
    pb.finish();
    eprintln!("   Created {} candidates: {:?}", count, start.elapsed());

    eprintln!("\n{}", "3. Scanning...".dimmed());
    let scanner = Scanner::new(
        keys,
        ScannerConfig::new()
            .view_tag_scheme(scheme)
            .parallel(config.parallel_scan),
    );
    let pb = bar(count as u64, "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?;
    let progress_bar = pb.clone();
    let callback: ProgressCallback = Box::new(move |progress| progress_bar.set_position(progress.scanned));
    let results = scanner.scan_with_progress(&candidates, callback);
    pb.finish();

    let summary = ScanSummary::from(scanner.stats());
    eprintln!("\n{}", "Results:".green().bold());
    eprintln!("   Scanned: {}", summary.total_scanned);
    eprintln!("   Scan rate: {:.0} candidates/sec", summary.rate);
    eprintln!("   View tag matches: {}", summary.view_tag_matches);
    eprintln!("   Filter efficiency: {:.2}%", summary.filter_efficiency);

    // Tag collisions with decoys are reported too, so only a shortfall is a failure.
    if results.len() >= ours {
        eprintln!(
            "   {} Found {} payment(s), {} addressed to us",
            "OK".green(),
            results.len(),
            ours
        );
    } else {
        eprintln!(
            "   {} Expected at least {}, found {}",
            "MISSING".red(),
            ours,
            results.len()
        );
    }

    Ok(())
}
