//! Command-line interface for playroom.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Playroom - turn-based games with a REST interface
#[derive(Parser, Debug)]
#[command(name = "playroom")]
#[command(about = "Tic-tac-toe and chess sessions against humans or the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Count move-generation leaf nodes from a chess position
    Perft {
        /// Position in FEN (default: starting position)
        #[arg(long)]
        fen: Option<String>,

        /// Search depth in plies
        #[arg(short, long)]
        depth: u32,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
}
