//! Playroom - unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use playroom::ServerConfig;
use playroom_chess::{Position, perft};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Perft { fen, depth, divide } => run_perft(fen, depth, divide),
    }
}

/// Run the HTTP game server
async fn run_server(path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ServerConfig::load(path.as_deref())?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    info!(?config, "Starting playroom server");
    playroom::serve(config).await
}

/// Count perft nodes and print them
fn run_perft(fen: Option<String>, depth: u32, divide: bool) -> Result<()> {
    let position = match fen {
        Some(fen) => Position::from_fen(&fen).with_context(|| format!("Invalid FEN {fen:?}"))?,
        None => Position::starting(),
    };

    let started = Instant::now();
    let nodes = if divide && depth > 0 {
        let mut total = 0;
        for mv in position.legal_moves() {
            let count = perft(&position.after(&mv), depth - 1);
            println!("{mv}: {count}");
            total += count;
        }
        println!();
        total
    } else {
        perft(&position, depth)
    };

    println!("Nodes searched: {nodes}");
    info!(depth, nodes, elapsed_ms = started.elapsed().as_millis() as u64, "Perft finished");
    Ok(())
}
