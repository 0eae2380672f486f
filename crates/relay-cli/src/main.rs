//! Resource Relay stdio shell.
//!
//! Reads one JSON `ClientMessage` per line from stdin and writes JSON
//! `ServerMessage` lines to stdout. Logs go to stderr.

use anyhow::Context;
use relay_core::{Difficulty, EngineConfig};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod protocol;
mod session;

use protocol::ServerMessage;
use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = config_from_env()?;
    info!(difficulty = %config.difficulty, seed = ?config.seed, "Starting Resource Relay...");

    let mut session = Session::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    send(&mut stdout, &session.welcome())?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match session.handle_line(&line) {
            Ok(replies) => {
                for reply in &replies {
                    send(&mut stdout, reply)?;
                }
            }
            Err(e) => {
                warn!("{}", e);
                send(
                    &mut stdout,
                    &ServerMessage::Error {
                        message: e.to_string(),
                    },
                )?;
            }
        }
    }

    info!(outcome = ?session.game().outcome(), "Input closed, exiting");
    Ok(())
}

/// Engine options from `RELAY_DIFFICULTY`, `RELAY_SEED`, `RELAY_GRID_SIZE` and
/// `RELAY_ENFORCE_ADJACENCY`
fn config_from_env() -> anyhow::Result<EngineConfig> {
    let difficulty: Difficulty = std::env::var("RELAY_DIFFICULTY")
        .unwrap_or_else(|_| "easy".into())
        .parse()?;

    let mut config = EngineConfig::new(difficulty);

    if let Ok(seed) = std::env::var("RELAY_SEED") {
        config.seed = Some(seed.parse().context("RELAY_SEED must be an unsigned integer")?);
    }

    if let Ok(size) = std::env::var("RELAY_GRID_SIZE") {
        let size: usize = size
            .parse()
            .context("RELAY_GRID_SIZE must be an unsigned integer")?;
        config = config.with_grid_size(size)?;
    }

    if let Ok(flag) = std::env::var("RELAY_ENFORCE_ADJACENCY") {
        config.enforce_adjacency = flag
            .parse()
            .context("RELAY_ENFORCE_ADJACENCY must be true or false")?;
    }

    Ok(config)
}

fn send(out: &mut impl Write, msg: &ServerMessage) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, msg)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
