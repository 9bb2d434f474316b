mod app;
mod commands;
mod prompt;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mahir", about = "Queue-based spaced repetition for vocabulary sets", version)]
struct Cli {
    /// Config file (default: <config dir>/mahir/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Seed for shuffles, for reproducible decks
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty study set
    Init {
        /// Path of the new set file
        path: PathBuf,
        /// Set name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Sessions per cycle
        #[arg(long)]
        cycle_length: Option<u32>,
        /// Minimum deck size
        #[arg(long)]
        deck_min: Option<usize>,
    },

    /// Add a new term to a set
    Add {
        /// Term text
        term: String,
        /// Definition
        definition: String,
        /// Set file (defaults to the configured set)
        #[arg(long)]
        set: Option<PathBuf>,
        /// Comma-separated corpus node ids of the term's lexemes
        #[arg(long)]
        lexemes: Option<String>,
        /// Term id (defaults to the next free number)
        #[arg(long)]
        id: Option<String>,
    },

    /// Run a study session
    Study {
        /// Set file (defaults to the configured set)
        set: Option<PathBuf>,
    },

    /// Show the deck the next session would build, without saving
    Preview {
        set: Option<PathBuf>,
    },

    /// Show queue sizes, cycle state and session history
    Stats {
        set: Option<PathBuf>,
        /// Number of recent sessions to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Check that queues match term scores
    Check {
        set: Option<PathBuf>,
    },

    /// Move terms to the queues of their current scores and save
    Rebalance {
        set: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref(), cli.format, cli.no_color, cli.seed)?;

    match cli.command {
        Command::Init { path, name, cycle_length, deck_min } => {
            commands::init::run(&app, &path, name.as_deref(), cycle_length, deck_min)?;
        }
        Command::Add { term, definition, set, lexemes, id } => {
            commands::add::run(&app, set, &term, &definition, lexemes.as_deref(), id)?;
        }
        Command::Study { set } => {
            commands::study::run(&app, set)?;
        }
        Command::Preview { set } => {
            commands::preview::run(&app, set)?;
        }
        Command::Stats { set, limit } => {
            commands::stats::run(&app, set, limit)?;
        }
        Command::Check { set } => {
            commands::check::run(&app, set)?;
        }
        Command::Rebalance { set } => {
            commands::rebalance::run(&app, set)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
pub fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
