//! trickle-cli: inspect and simulate self-adjusting claim distributions.
//!
//! Parameters come from a JSON file or the built-in defaults, with a few
//! command-line overrides. Every command is offline: `simulate` runs claims
//! against an in-memory ledger.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use trickle_claim::{ClaimController, ClaimQuote, ClaimReceipt};
use trickle_core::error::{ClaimError, TrickleError};
use trickle_core::ledger::MemoryLedger;
use trickle_core::params::{DistributionConfig, DistributionParams};
use trickle_core::types::{AccountId, CallContext};
use trickle_core::wad::format_wad;
use trickle_decay::LinearSchedule;

#[derive(Parser)]
#[command(name = "trickle-cli")]
#[command(version, about = "Self-adjusting one-shot claim distributions")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the validated configuration and derived values.
    Params(ParamsArgs),
    /// Multiplier and amount for a hypothetical claim.
    Quote(QuoteArgs),
    /// Run a sequence of claims and summarise issuance.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// JSON parameter file (default: built-in one-week distribution).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the start time (unix seconds).
    #[arg(long)]
    start_time: Option<u64>,

    /// Reject relayed claims.
    #[arg(long)]
    only_direct: bool,
}

#[derive(Args)]
struct ParamsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QuoteArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Seconds after the start time.
    #[arg(long)]
    at: u64,

    /// Cumulative issuance before the claim, in base units.
    #[arg(long, default_value_t = 0)]
    supply: u128,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Number of claims, each from a distinct account.
    #[arg(short = 'n', long)]
    claims: u64,

    /// Seconds between consecutive claims.
    #[arg(short, long)]
    interval: u64,

    /// Seconds after the start time of the first claim.
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Print each receipt as a JSON line.
    #[arg(long)]
    receipts: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Params(args) => cmd_params(args),
        Commands::Quote(args) => cmd_quote(args),
        Commands::Simulate(args) => cmd_simulate(args),
    }
}

fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Load parameters from `path` or the defaults, then apply overrides.
fn load_params(source: &SourceArgs) -> Result<DistributionParams> {
    let mut params = match &source.file {
        Some(path) => read_params(path)?,
        None => DistributionParams::default(),
    };
    if let Some(start) = source.start_time {
        params.start_time = start;
    }
    if source.only_direct {
        params.only_direct_callers = true;
    }
    Ok(params)
}

fn read_params(path: &Path) -> Result<DistributionParams> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    DistributionParams::from_json(&json)
        .with_context(|| format!("Invalid parameter file {}", path.display()))
}

fn build(source: &SourceArgs) -> Result<ClaimController<MemoryLedger>> {
    let params = load_params(source)?;
    create(&params).context("Invalid distribution parameters")
}

/// Library boundary: every core failure surfaces as a [`TrickleError`].
fn create(params: &DistributionParams) -> Result<ClaimController<MemoryLedger>, TrickleError> {
    let config = DistributionConfig::from_params(params)?;
    Ok(ClaimController::new(config, MemoryLedger::new())?)
}

fn cmd_params(args: ParamsArgs) -> Result<()> {
    let c = build(&args.source)?;
    let schedule = LinearSchedule::from_config(c.config()).map_err(TrickleError::from)?;
    let units_per_time_unit = schedule.units_per_time_unit().map_err(TrickleError::from)?;

    if args.json {
        let value = serde_json::json!({
            "name": c.name(),
            "symbol": c.symbol(),
            "decimals": c.decimals(),
            "max_supply": c.max_supply().to_string(),
            "only_direct_callers": c.only_direct_callers(),
            "start_time": c.start_time(),
            "target_end_time": c.target_end_time(),
            "target_duration_secs": c.target_duration(),
            "network_step_interval_secs": c.network_step_interval(),
            "time_unit_secs": c.time_unit_secs(),
            "target_units_per_step": c.target_units_per_step().to_string(),
            "units_per_time_unit_wad": units_per_time_unit.to_string(),
            "decay_constant_wad": c.decay_constant().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} ({})", c.name(), c.symbol());
    println!("  decimals:            {}", c.decimals());
    println!("  max supply:          {}", format_units(c.max_supply(), c.decimals()));
    println!("  direct callers only: {}", c.only_direct_callers());
    println!("  start:               {}", format_time(c.start_time()));
    println!("  target end:          {}", format_time(c.target_end_time()));
    println!("  step interval:       {}s", c.network_step_interval());
    println!("  time unit:           {}s", c.time_unit_secs());
    println!(
        "  per-step baseline:   {}",
        format_units(c.target_units_per_step(), c.decimals())
    );
    println!("  decay constant:      {}", format_wad(c.decay_constant()));
    Ok(())
}

fn cmd_quote(args: QuoteArgs) -> Result<()> {
    let c = build(&args.source)?;
    let at = c
        .start_time()
        .checked_add(args.at)
        .context("Quote time overflows")?;
    if args.supply > c.max_supply() {
        bail!(
            "Supply {} exceeds max supply {}",
            args.supply,
            c.max_supply()
        );
    }

    match c.quote_with_supply(at, args.supply) {
        Ok(quote) => print_quote(&c, &quote),
        Err(ClaimError::MaxSupplyReached) => println!("max supply reached; nothing to claim"),
        Err(e) => return Err(TrickleError::from(e)).context("Quote failed"),
    }
    Ok(())
}

fn print_quote(c: &ClaimController<MemoryLedger>, quote: &ClaimQuote) {
    println!("deviation:  {} time units", format_wad(quote.deviation));
    println!("multiplier: {}", format_u256_wad(quote.quotient));
    println!(
        "amount:     {} (baseline {})",
        format_units(quote.amount, c.decimals()),
        format_units(c.target_units_per_step(), c.decimals())
    );
}

/// Outcome of a simulated claim sequence.
#[derive(Debug, Default, PartialEq, Eq)]
struct SimulationSummary {
    /// Claims that minted a positive amount.
    minted: u64,
    /// Claims that succeeded with a zero amount.
    no_ops: u64,
    /// Index and time of the claim that found the supply exhausted.
    exhausted_at: Option<(u64, u64)>,
}

/// Run `args.claims` claims from distinct accounts, passing each receipt to
/// `on_receipt`. Stops at the first `MaxSupplyReached`.
fn run_simulation(
    c: &ClaimController<MemoryLedger>,
    args: &SimulateArgs,
    mut on_receipt: impl FnMut(&ClaimReceipt) -> Result<()>,
) -> Result<SimulationSummary> {
    let start = c.start_time();
    let mut summary = SimulationSummary::default();
    for i in 0..args.claims {
        let t = args
            .interval
            .checked_mul(i)
            .and_then(|d| d.checked_add(args.offset))
            .and_then(|d| d.checked_add(start))
            .context("Claim time overflows")?;
        let account = AccountId::from_label(&format!("sim-{i}"));
        match c.claim(&CallContext::direct(account, t)) {
            Ok(receipt) => {
                if receipt.amount > 0 {
                    summary.minted += 1;
                } else {
                    summary.no_ops += 1;
                }
                on_receipt(&receipt)?;
            }
            Err(ClaimError::MaxSupplyReached) => {
                info!(claim = i, time = t, "max supply reached");
                summary.exhausted_at = Some((i, t));
                break;
            }
            Err(e) => {
                warn!(claim = i, error = %e, "claim failed");
                return Err(TrickleError::from(e)).with_context(|| format!("Claim {i} failed"));
            }
        }
    }
    Ok(summary)
}

fn cmd_simulate(args: SimulateArgs) -> Result<()> {
    if args.claims == 0 {
        bail!("--claims must be positive");
    }
    let c = build(&args.source)?;
    let start = c.start_time();

    let summary = run_simulation(&c, &args, |receipt| {
        if args.receipts {
            println!("{}", serde_json::to_string(receipt)?);
        }
        Ok(())
    })?;

    let issued = c.cumulative_issued();
    println!("claims:     {}/{} minted", summary.minted, args.claims);
    if summary.no_ops > 0 {
        println!("no-ops:     {} (zero amount, account not marked)", summary.no_ops);
    }
    println!(
        "issued:     {} of {}",
        format_units(issued, c.decimals()),
        format_units(c.max_supply(), c.decimals())
    );
    if let Some((i, t)) = summary.exhausted_at {
        println!("exhausted:  at claim {i} ({})", format_time(t));
    } else {
        let last = start + args.offset + args.interval * (args.claims - 1);
        let target = c
            .config()
            .max_supply()
            .saturating_mul(u128::from(last - start).min(u128::from(c.target_duration())))
            / u128::from(c.target_duration());
        println!(
            "schedule:   {} expected by {}",
            format_units(target, c.decimals()),
            format_time(last)
        );
    }
    Ok(())
}

/// Base units as a decimal string with `decimals` fractional digits.
fn format_units(amount: u128, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let frac = format!("{:0width$}", amount % scale, width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{}", amount / scale)
    } else {
        format!("{}.{frac}", amount / scale)
    }
}

fn format_u256_wad(v: trickle_core::U256) -> String {
    match trickle_core::wad::u256_to_u128(v) {
        Some(x) if x <= i128::MAX as u128 => format_wad(x as i128),
        _ => format!("{v} (wad)"),
    }
}

fn format_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{secs}s"))
}
