//! `raptor-bridge` – replay race-control traffic through the adapter.
//!
//! 1. Loads `raptor.toml` (or defaults) and applies `RAPTOR_*` overrides.
//! 2. Builds an in-process bridge with the configured identity and installs
//!    the translators of the configured schema family.
//! 3. Binds a sensor to a simulated vehicle backend and attaches it.
//! 4. Replays NDJSON rosbridge frames from a file or stdin.
//! 5. Prints the actuator calls and the final diagnostic snapshot.
//!
//! Ctrl-C stops the replay before the next frame.  The flag is checked
//! between lines, so on an idle interactive stdin a second Ctrl-C exits
//! immediately with status 130.

mod config;
mod replay;
mod telemetry;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use colored::Colorize;
use serde_json::json;
use tracing::{error, warn};

use raptor_hal::{ActuatorBinding, SimVehicle, VehicleActuator};
use raptor_middleware::{LocalBridge, RaptorBridgePlugin, Registration};
use raptor_sensor::{
    BridgeAttachment, DiagnosticSnapshot, Mockup, RaceControl, RaptorSensor, SchemaFamily,
    SharedClock, SimClock,
};
use raptor_types::RaptorError;

use crate::config::{BackendChoice, Config, SchemaKind};
use crate::replay::{ReplayStats, replay, request_stop};

#[derive(Debug, Parser)]
#[command(
    name = "raptor-bridge",
    version,
    about = "Replay race-control frames through the Raptor adapter",
    after_help = "Ctrl-C stops before the next frame; press it twice to exit while stdin is idle."
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "raptor.toml")]
    config: PathBuf,

    /// Write the effective configuration to `--config` and exit.
    #[arg(long)]
    init: bool,

    /// Start with the simulation clock paused (time scale 0).
    #[arg(long)]
    paused: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// NDJSON frame file; stdin when omitted.
    frames: Option<PathBuf>,
}

fn main() -> ExitCode {
    let _guard = telemetry::init_tracing("raptor-bridge");
    let cli = Cli::parse();

    let cfg = match config::load_from(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    if cli.init {
        return match config::save_to(&cfg, &cli.config) {
            Ok(()) => {
                println!("{} {}", "✓ wrote".green(), cli.config.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "could not write configuration");
                ExitCode::FAILURE
            }
        };
    }

    match run(&cli, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, cfg: &Config) -> Result<(), RaptorError> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || {
        if request_stop(&shutdown_flag) {
            eprintln!("{}", "✗ second Ctrl-C – exiting".red().bold());
            std::process::exit(130);
        }
        eprintln!(
            "{}",
            "⚠  Ctrl-C received – stopping replay (press again to exit now)".yellow().bold()
        );
    }) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let bridge = LocalBridge::new(cfg.bridge.descriptor());
    let vehicle = Arc::new(SimVehicle::new(match cfg.vehicle.backend {
        BackendChoice::Alternate => "alternate",
        _ => "vehicle_dynamics",
    }));
    let actuator = vehicle.clone() as Arc<dyn VehicleActuator>;
    let binding = match cfg.vehicle.backend {
        BackendChoice::VehicleDynamics => ActuatorBinding::resolve(Some(actuator), None),
        BackendChoice::Alternate => ActuatorBinding::resolve(None, Some(actuator)),
        BackendChoice::None => ActuatorBinding::resolve(None, None),
    };

    let clock = Arc::new(SharedClock::new());
    if cli.paused {
        clock.pause();
    }

    let session = Session {
        cli,
        cfg,
        bridge: &bridge,
        binding,
        clock,
        shutdown: &shutdown,
    };
    let report = match cfg.sensor.schema {
        SchemaKind::RaceControl => session.run::<RaceControl>()?,
        SchemaKind::Mockup => session.run::<Mockup>()?,
    };

    print_report(cli, cfg, &report, &vehicle);
    Ok(())
}

struct Session<'a> {
    cli: &'a Cli,
    cfg: &'a Config,
    bridge: &'a LocalBridge,
    binding: ActuatorBinding,
    clock: Arc<SharedClock>,
    shutdown: &'a AtomicBool,
}

struct Report {
    registration: Registration,
    attached: bool,
    paused: bool,
    stats: ReplayStats,
    snapshot: DiagnosticSnapshot,
}

impl Session<'_> {
    fn run<F: SchemaFamily>(self) -> Result<Report, RaptorError> {
        let registration =
            RaptorBridgePlugin::new(F::message_kinds().iter().copied()).register(self.bridge);

        let sensor = Arc::new(RaptorSensor::<F>::new(
            self.cfg.sensor.topics(),
            self.binding,
            self.clock.clone(),
        ));
        let attached = matches!(
            sensor.on_bridge_setup(self.bridge)?,
            BridgeAttachment::Attached(_)
        );

        let stats = match &self.cli.frames {
            Some(path) => replay(self.bridge, BufReader::new(File::open(path)?), self.shutdown)?,
            None => replay(self.bridge, std::io::stdin().lock(), self.shutdown)?,
        };

        Ok(Report {
            registration,
            attached,
            paused: self.clock.is_paused(),
            stats,
            snapshot: sensor.snapshot(),
        })
    }
}

fn print_report(cli: &Cli, cfg: &Config, report: &Report, vehicle: &SimVehicle) {
    if cli.json {
        let doc = json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "schema": cfg.sensor.schema.to_string(),
            "bridge": cfg.bridge.descriptor(),
            "installed": report.registration.is_installed(),
            "attached": report.attached,
            "paused": report.paused,
            "stats": report.stats,
            "actuator_calls": vehicle.calls(),
            "engine_running": vehicle.engine_running(),
            "emergency_stopped": vehicle.emergency_stopped(),
            "snapshot": report.snapshot,
        });
        match serde_json::to_string_pretty(&doc) {
            Ok(s) => println!("{s}"),
            Err(e) => error!(error = %e, "could not serialise report"),
        }
        return;
    }

    println!("{}", "Raptor bridge replay".bold().cyan());
    println!("  schema     : {}", cfg.sensor.schema);
    println!("  bridge     : {}", cfg.bridge.descriptor());
    match &report.registration {
        Registration::Installed(kinds) => {
            let names: Vec<&str> = kinds.iter().map(|k| k.type_name()).collect();
            println!("  translators: {}", names.join(", ").green());
        }
        Registration::NotInstalled => {
            println!("  translators: {}", "none (bridge not supported)".yellow());
        }
    }
    if !report.attached {
        println!("  {}", "sensor not attached".yellow());
    }
    if report.paused {
        println!("  {}", "clock paused – all frames discarded".yellow());
    }
    println!(
        "  frames     : {} read, {} delivered, {} rejected",
        report.stats.frames, report.stats.delivered, report.stats.rejected
    );

    let calls: Vec<String> = vehicle.calls().iter().map(|a| a.to_string()).collect();
    println!(
        "  actuator   : {}",
        if calls.is_empty() { "no calls".to_string() } else { calls.join(" → ") }
    );
    println!(
        "  vehicle    : engine {}, emergency stop {}",
        if vehicle.engine_running() { "running".green() } else { "stopped".normal() },
        if vehicle.emergency_stopped() { "LATCHED".red().bold() } else { "clear".normal() },
    );

    println!("{}", "Snapshot".bold().cyan());
    for (key, value) in report.snapshot.iter() {
        println!("  {key:<26} {value}");
    }
}
