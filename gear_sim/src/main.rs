//! # Gear Simulation Binary
//!
//! Runs landing gear controllers against a flat ground plane.
//!
//! # Usage
//!
//! ```bash
//! # Run the sample scenario
//! gear_sim config/gear_sim.toml
//!
//! # Paced to wall-clock time, state kept across runs
//! gear_sim config/gear_sim.toml --realtime --state-file state/gear.bin
//!
//! # JSON logs and report
//! gear_sim config/gear_sim.toml --ticks 1000 --json
//! ```

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use clap::Parser;
use gear_common::config::{ConfigLoader, LogLevel};
use gear_common::consts::DEFAULT_CONFIG_PATH;
use gear_sim::{SimConfig, SimReport, Simulation};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Landing gear host simulation
#[derive(Parser, Debug)]
#[command(name = "gear_sim")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Runs landing gear controllers against a simulated scene")]
#[command(long_about = None)]
struct Args {
    /// Path to the simulation configuration file.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of ticks to run (overrides `sim.ticks`).
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Pace ticks to wall-clock time.
    #[arg(short, long)]
    realtime: bool,

    /// State file (overrides `sim.state_file`).
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Enable verbose logging (overrides `shared.log_level`)
    #[arg(short, long)]
    verbose: bool,

    /// Output logs and the final report in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("gear_sim failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config first so its log level can seed the subscriber.
    let loaded = SimConfig::load(&args.config);
    let log_level = loaded
        .as_ref()
        .map(|config| config.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("Gear simulation v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.map_err(|e| format!("{}: {e}", args.config.display()))?;
    if let Some(path) = args.state_file.clone() {
        config.sim.state_file = Some(path);
    }
    let ticks = args.ticks.unwrap_or(config.sim.ticks);
    info!(
        "Loaded '{}' from {:?}: {} parts, {} gears",
        config.shared.service_name,
        args.config,
        config.parts.len(),
        config.gears.len()
    );

    let mut sim = Simulation::new(&config)?;

    let running = sim.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let report = sim.run(ticks, args.realtime);
    sim.shutdown()?;

    print_report(&report, args.json)?;
    info!("Gear simulation shutdown complete");
    Ok(())
}

fn print_report(report: &SimReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    info!("{} ticks, t={:.2}s", report.ticks, report.sim_time);
    for gear in &report.gears {
        info!(
            "{:<12} {:<10} legs {}/{} components {:?} transitions {}",
            gear.name,
            gear.state.as_str(),
            gear.active_legs,
            gear.configured_legs,
            gear.components(),
            gear.transitions
        );
    }
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
///
/// `RUST_LOG` wins when set; otherwise the config's `shared.log_level`
/// applies, raised to debug by `--verbose`.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let directive = log_level.with_verbose(args.verbose).as_directive();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
