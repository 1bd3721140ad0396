//! CLI frontend for the csim combat simulator.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "csim",
    about = "csim: a deterministic two-army combat simulator",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one headless game between two agents
    Run(commands::run::RunArgs),

    /// Compare spatial index queries against brute force on random points
    CheckIndex {
        /// Number of random point sets to test
        #[arg(short, long, default_value = "50")]
        trials: u32,

        /// Points per set
        #[arg(short, long, default_value = "500")]
        points: usize,

        /// Split threshold of the index under test
        #[arg(short, long, default_value = "40")]
        eps: f64,

        /// RNG seed for the point sets
        #[arg(short, long, default_value = "1")]
        seed: u64,
    },

    /// List the unit types available to scenarios
    Units {
        /// JSON file with a unit type table (default: built-in marine and tank)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(&args),
        Commands::CheckIndex {
            trials,
            points,
            eps,
            seed,
        } => commands::check_index::run(trials, points, eps, seed),
        Commands::Units { file } => commands::units::run(file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
