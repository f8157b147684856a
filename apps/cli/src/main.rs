//! `silentzone`: replay a recorded walk through a monitoring session.
//!
//! ```text
//! silentzone run --scenario scenarios/walk.json [--settings settings.json] [--offline] [--no-haptics] [--quiet]
//! silentzone patterns [KIND]
//! ```

mod console;
mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::ConsoleBus;
use scenario::Scenario;
use silentzone_events::{EventBusRef, NullEventBus};
use silentzone_feed::ReplayProvider;
use silentzone_notify::{
    pattern_for, HapticOutput, LogHaptics, NullHaptics, ReminderGenerator, StaticGenerator,
    VibrationKind,
};
use silentzone_session::{Session, SessionParts, Settings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "silentzone")]
#[command(about = "Classroom geofence reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file through a session
    Run {
        /// Scenario JSON with zones and a track
        #[arg(long)]
        scenario: PathBuf,

        /// Settings file (defaults to the platform config directory)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Never call the text-generation service
        #[arg(long, default_value = "false")]
        offline: bool,

        /// Do not log vibration patterns
        #[arg(long, default_value = "false")]
        no_haptics: bool,

        /// Only print the final snapshot
        #[arg(long, default_value = "false")]
        quiet: bool,
    },

    /// List the vibration patterns, or show one by key
    Patterns {
        /// Vibration key, e.g. "pulse"
        kind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,silentzone=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            settings,
            offline,
            no_haptics,
            quiet,
        } => {
            run(RunOptions {
                scenario,
                settings,
                offline,
                no_haptics,
                quiet,
            })
            .await
        }
        Commands::Patterns { kind: Some(key) } => {
            println!("{} {:?}", key, pattern_for(&key));
            Ok(())
        }
        Commands::Patterns { kind: None } => {
            for kind in VibrationKind::ALL {
                println!("{:8} {:16} {:?}", kind.key(), kind.label(), kind.pattern());
            }
            Ok(())
        }
    }
}

struct RunOptions {
    scenario: PathBuf,
    settings: Option<PathBuf>,
    offline: bool,
    no_haptics: bool,
    quiet: bool,
}

async fn run(options: RunOptions) -> Result<()> {
    let RunOptions {
        scenario: scenario_path,
        settings: settings_path,
        offline,
        no_haptics,
        quiet,
    } = options;

    let settings = match &settings_path {
        Some(path) => Settings::load(path),
        None => Settings::load_default(),
    }
    .context("failed to load settings")?
    .with_env_key();

    let scenario = Scenario::load(&scenario_path)?;
    let steps = scenario.steps()?;
    tracing::info!(
        zones = scenario.zones.len(),
        steps = steps.len(),
        offline,
        "starting scenario"
    );

    let generator: Arc<dyn ReminderGenerator> = if offline {
        Arc::new(StaticGenerator)
    } else {
        settings.build_generator()
    };
    let haptics: Arc<dyn HapticOutput> = if no_haptics {
        Arc::new(NullHaptics)
    } else {
        Arc::new(LogHaptics)
    };
    let bus: EventBusRef = if quiet {
        Arc::new(NullEventBus)
    } else {
        Arc::new(ConsoleBus::new())
    };
    let provider = Arc::new(ReplayProvider::new(steps));
    let session = Session::new(
        &settings,
        SessionParts {
            provider: provider.clone(),
            generator,
            haptics,
            bus,
        },
    )?;

    for draft in scenario.zones {
        let name = draft.name.clone();
        session
            .add_zone(draft)
            .with_context(|| format!("invalid zone {:?}", name))?;
    }

    if !provider.is_empty() {
        session.start()?;
        provider.wait_finished().await;
    }
    session.stop();
    session.flush().await;

    let snapshot = session.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
