//! Command-line interface for combat_sim

use clap::Parser;
use std::path::PathBuf;

/// Headless elemental combat simulator
#[derive(Parser, Debug)]
#[command(name = "combat_sim")]
#[command(about = "Run automatic battles between two rosters")]
#[command(version)]
pub struct Args {
    /// Roster TOML file (defaults to the built-in demo roster)
    #[arg(long, value_name = "ROSTER_FILE")]
    pub roster: Option<PathBuf>,

    /// Engine constants TOML file
    #[arg(long, value_name = "CONSTANTS_FILE")]
    pub constants: Option<PathBuf>,

    /// Seed for crit rolls (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scheduler steps before the battle is called off
    #[arg(long, default_value = "2000")]
    pub max_steps: u64,

    /// Battles to run with consecutive seeds
    #[arg(long, default_value = "1")]
    pub trials: u32,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show this many upcoming turns before and after a single battle
    #[arg(long, default_value = "0", value_name = "TURNS")]
    pub timeline: usize,

    /// Print the effective engine constants as TOML and exit
    #[arg(long)]
    pub dump_constants: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
