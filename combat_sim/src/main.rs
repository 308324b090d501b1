//! combat_sim - Headless battle runner for combat_core rosters

mod cli;
mod report;

use combat_core::battle::{Battle, BattleError};
use combat_core::config::{default_roster, load_constants, load_roster, ConfigError, EngineConstants};
use report::TrialStats;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

#[derive(Error, Debug)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Battle(#[from] BattleError),
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to serialize constants: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Log to stderr, `RUST_LOG` overrides the info default
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: cli::Args) -> Result<(), SimError> {
    let constants = match &args.constants {
        Some(path) => load_constants(path)?,
        None => EngineConstants::default(),
    };
    if args.dump_constants {
        println!("{}", toml::to_string_pretty(&constants)?);
        return Ok(());
    }

    let roster = match &args.roster {
        Some(path) => load_roster(path)?,
        None => default_roster(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        players = roster.players.len(),
        enemies = roster.enemies.len(),
        seed,
        "roster loaded"
    );

    let trials = args.trials.max(1);
    let mut stats = TrialStats::default();
    for trial in 0..trials {
        let mut battle = Battle::from_config(&roster, constants.clone(), seed.wrapping_add(trial as u64))?;
        // Multi-seed runs only print the aggregate
        let verbose = trials == 1 && !args.json;
        if verbose && args.timeline > 0 {
            println!("Opening turn order:");
            print!("{}", report::render_timeline(&battle.turn_order(args.timeline), battle.units()));
            println!();
        }

        battle.run(args.max_steps)?;
        let summary = battle.summary();
        stats.record(summary);

        if trials == 1 {
            if args.json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                print!("{}", report::render(summary));
            }
        }
        if verbose && args.timeline > 0 {
            println!();
            println!("Upcoming turns:");
            print!("{}", report::render_timeline(&battle.turn_order(args.timeline), battle.units()));
        }
    }

    if trials > 1 {
        println!("{}", stats.render());
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = cli::parse_args();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "simulation failed");
            ExitCode::FAILURE
        }
    }
}
