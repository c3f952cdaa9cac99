use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use scan_o_mat::abort::AbortSignal;
use scan_o_mat::config::Config;
use scan_o_mat::definition::{DefinitionBuilder, DefinitionHandle, YamlDefinitionStore};
use scan_o_mat::planner::{plan, ScanPlan, ScanRequest};
use scan_o_mat::radar::{SimulatedConnector, SimulatedRadar};
use scan_o_mat::session::{ScanSession, SessionOptions, SessionReport};

#[derive(Parser)]
#[command(name = "scan-o-mat")]
#[command(about = "Radar positioner scan planning and execution")]
struct Cli {
    /// Station configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Run the definitions on the simulated radar instead of only reviewing them
    #[arg(long, global = true)]
    simulate: bool,
    /// Basename of the data files written by the radar
    #[arg(long, global = true)]
    basename: Option<String>,
    /// Write one repeating definition instead of one per sweep direction
    #[arg(long, global = true)]
    single_file: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Scan(Scan),
    /// Print the plan of a scan without writing definitions
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
        #[command(subcommand)]
        scan: Scan,
    },
    /// Read back and summarize existing definition files
    Show {
        #[arg(required = true)]
        definitions: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
enum Scan {
    /// Single elevation sweep at a fixed azimuth
    #[command(allow_negative_numbers = true)]
    Rhi {
        elevation_init: f64,
        elevation_end: f64,
        azimuth: f64,
    },
    /// Full azimuth circle at a fixed elevation, starting north
    #[command(allow_negative_numbers = true)]
    Ppi { elevation: f64 },
    /// Repeated elevation sweeps at a fixed azimuth
    #[command(allow_negative_numbers = true)]
    Elevation {
        elevation_init: f64,
        elevation_end: f64,
        azimuth: f64,
        /// Minimum scan time, e.g. "20m" (default from the configuration)
        #[arg(long, value_parser = humantime::parse_duration)]
        duration: Option<Duration>,
    },
    /// Repeated azimuth sweeps over a sector at a fixed elevation
    #[command(allow_negative_numbers = true)]
    Azimuth {
        azimuth_init: f64,
        azimuth_end: f64,
        elevation: f64,
        #[arg(long, value_parser = humantime::parse_duration)]
        duration: Option<Duration>,
    },
}

impl Scan {
    fn request(&self, config: &Config) -> ScanRequest {
        let default_duration = config.definitions.duration;
        match *self {
            Scan::Rhi {
                elevation_init,
                elevation_end,
                azimuth,
            } => ScanRequest::rhi(elevation_init, elevation_end, azimuth),
            Scan::Ppi { elevation } => ScanRequest::ppi(elevation, config.positioner.north_offset),
            Scan::Elevation {
                elevation_init,
                elevation_end,
                azimuth,
                duration,
            } => ScanRequest::elevation(
                elevation_init,
                elevation_end,
                azimuth,
                duration.unwrap_or(default_duration),
            ),
            Scan::Azimuth {
                azimuth_init,
                azimuth_end,
                elevation,
                duration,
            } => ScanRequest::azimuth(
                azimuth_init,
                azimuth_end,
                elevation,
                duration.unwrap_or(default_duration),
            ),
        }
    }
}

/// The first Ctrl-C stops the run, a second one the cleanup.
#[derive(Clone, Default)]
struct Signals {
    run: AbortSignal,
    cleanup: AbortSignal,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Error reading {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let signals = Signals::default();
    let remote = signals.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if remote.run.is_triggered() {
            info!("Received second interrupt, abandoning cleanup");
            remote.cleanup.trigger();
        } else {
            info!("Received interrupt, stopping");
            remote.run.trigger();
        }
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    match &cli.command {
        Commands::Scan(scan) => run_scan(&cli, &config, scan, &signals),
        Commands::Plan { json, scan } => print_plan(&config, scan, *json),
        Commands::Show { definitions } => {
            let handles: Vec<_> = definitions
                .iter()
                .map(|p| DefinitionHandle::from_path(p))
                .collect();
            run_session(&config, &handles, false, &signals)
        }
    }
}

fn make_plan(config: &Config, scan: &Scan) -> Option<ScanPlan> {
    match plan(&scan.request(config), &config.positioner) {
        Ok(plan) => Some(plan),
        Err(e) => {
            error!("Cannot plan scan: {}", e);
            None
        }
    }
}

fn print_plan(config: &Config, scan: &Scan, json: bool) -> ExitCode {
    let Some(plan) = make_plan(config, scan) else {
        return ExitCode::FAILURE;
    };

    if json {
        match serde_json::to_string_pretty(&plan) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Cannot serialize plan: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{} ({} axis)", plan.kind, plan.axis);
        for (i, leg) in plan.legs().iter().enumerate() {
            println!(
                "  leg {}: elv {:.2}° -> {:.2}° at {}°/s, azm {:.2}° -> {:.2}° at {}°/s",
                i,
                leg.elevation,
                leg.elevation_target,
                leg.elevation_speed,
                leg.azimuth,
                leg.azimuth_target,
                leg.azimuth_speed
            );
        }
        println!("  movement:  {} s", plan.movement_time);
        println!("  one sweep: {} s", plan.one_scan_duration);
        println!("  sweeps:    {}", plan.sweep_count);
        println!("  total:     {} s", plan.total_duration);
    }
    ExitCode::SUCCESS
}

fn run_scan(cli: &Cli, config: &Config, scan: &Scan, signals: &Signals) -> ExitCode {
    let Some(plan) = make_plan(config, scan) else {
        return ExitCode::FAILURE;
    };

    let store = YamlDefinitionStore::new();
    let builder = DefinitionBuilder::new(&store, &config.definitions);
    let separate_files = config.definitions.separate_files && !cli.single_file;
    let handles = match builder.build(&plan, cli.basename.as_deref(), separate_files) {
        Ok(handles) => handles,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    run_session(config, &handles, cli.simulate, signals)
}

fn run_session(
    config: &Config,
    handles: &[DefinitionHandle],
    live: bool,
    signals: &Signals,
) -> ExitCode {
    let store = YamlDefinitionStore::new();
    let connector = SimulatedConnector::new(
        SimulatedRadar::new("simulated").with_active_definition("DEFAULT.MDF"),
    );
    let options = SessionOptions::from_config(&config.session, !live);
    let session = ScanSession::new(&connector, &store, config.radar.clone(), options)
        .with_cleanup_signal(signals.cleanup.clone());

    match session.run(handles, &signals.run) {
        Ok(report) => {
            summarize(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn summarize(report: &SessionReport) {
    if report.dry_run {
        info!("Reviewed {} definition(s)", report.handles.len());
        return;
    }
    info!(
        "Ran {} of {} definition(s){}",
        report.completed,
        report.handles.len(),
        if report.aborted { ", stopped manually" } else { "" }
    );
    for failure in &report.command_failures {
        warn!("{}", failure);
    }
    if report.cleanup_interrupted {
        warn!("Cleanup was interrupted, check the radar state");
    }
    match &report.previous {
        Some(previous) if report.restored => info!("Radar is back on {}", previous),
        Some(previous) => warn!("Radar could not be put back on {}", previous),
        None => {}
    }
}
