// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// First season of league play.
pub const FIRST_SEASON: i64 = 1946;

#[derive(Debug, Parser)]
#[command(name = "courtside")]
#[command(about = "NBA player stats dashboard backed by the balldontlie API", long_about = None)]
pub struct Cli {
    /// Season to query (e.g. 2024). Defaults to the current year.
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(FIRST_SEASON..))]
    pub season: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Interactive terminal dashboard (default)
    Tui,

    /// Pass-through HTTP server for the dashboard endpoints
    Serve {
        /// Port to listen on. Overrides `[server] port`.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write teams.json, playersByTeam.json and projections.json
    Export {
        /// Output directory. Overrides `[export] output_dir`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }
}
