//! CLI host for dnd5e resources: plans and applies a desired configuration
//! against a local state file.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "dnd5e",
    about = "Declarative D&D 5e character sheets and dice rolls",
    version,
    propagate_version = true
)]
struct Cli {
    /// State file tracking created resources
    #[arg(
        long,
        global = true,
        env = "DND5E_STATE",
        default_value = "dnd5e.state.json"
    )]
    state: PathBuf,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what apply would change
    Plan {
        /// Desired configuration file
        #[arg(short, long, default_value = "dnd5e.json")]
        config: PathBuf,
    },

    /// Converge state to the desired configuration
    Apply {
        /// Desired configuration file
        #[arg(short, long, default_value = "dnd5e.json")]
        config: PathBuf,

        /// RNG seed for deterministic rolls
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show tracked resources, or one resource's attributes
    Show {
        /// Resource address, e.g. dnd5e_character.aria
        address: Option<String>,
    },

    /// Stop tracking every resource
    Destroy,

    /// Roll dice without touching state
    Roll {
        /// Number of dice
        #[arg(short, long, default_value_t = 1)]
        number: i64,

        /// Sides per die (2-20)
        #[arg(short, long, default_value_t = 20)]
        sides: i64,

        /// Flat modifier added to the total
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        modifier: i64,

        /// RNG seed for a deterministic roll
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Plan { config } => commands::plan::run(&cli.state, &config),
        Commands::Apply { config, seed } => commands::apply::run(&cli.state, &config, seed),
        Commands::Show { address } => commands::show::run(&cli.state, address.as_deref()),
        Commands::Destroy => commands::destroy::run(&cli.state),
        Commands::Roll {
            number,
            sides,
            modifier,
            seed,
        } => commands::roll::run(number, sides, modifier, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
