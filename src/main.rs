//! # Burrow Console Front-End
//!
//! Loads a world directory, starts the session worker, and plays it from the
//! terminal: commands are read from stdin and every snapshot is printed.

use burrow::{
    render_snapshot, BurrowError, BurrowResult, Command, EngineConfig, Input, Session, SessionEnd,
    Snapshot, WorldLoader, COMMAND_HELP,
};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Command line arguments for the Burrow console.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(about = "A turn-based dungeon crawler played from the terminal")]
#[command(version)]
struct Args {
    /// Directory holding the *.map levels and the world linkage file
    #[arg(short, long, default_value = "assets/maps")]
    world: PathBuf,

    /// JSON engine configuration; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Number of console windows subscribed to the session
    #[arg(long, default_value_t = 1)]
    windows: usize,
}

#[tokio::main]
async fn main() -> BurrowResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);
    info!("Starting Burrow v{}", burrow::VERSION);

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let world = WorldLoader::load_directory(&config, &args.world)?;

    let mut session = Session::new(world);
    let keyboard = session.subscribe();
    for window in 1..args.windows.max(1) {
        let (_, snapshots, _) = session.subscribe().into_parts();
        tokio::spawn(mirror_window(window, snapshots));
    }
    let worker = session.spawn();

    println!("{}\n", COMMAND_HELP);
    play(keyboard).await?;

    let end = worker
        .await
        .map_err(|err| BurrowError::InvariantViolation(format!("session worker failed: {}", err)))?;
    match end {
        Ok(SessionEnd::PlayerDied { killer }) => println!("You were killed by {}.", killer),
        Ok(SessionEnd::Quit) => println!("Bye."),
        Ok(other) => info!("session ended: {:?}", other),
        Err(err) => {
            error!("session failed: {}", err);
            return Err(err);
        }
    }
    Ok(())
}

/// Initializes env_logger at `log_level` unless RUST_LOG is set.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();
}

/// Drives the keyboard window: prints snapshots as they arrive and turns
/// stdin lines into inputs.
async fn play(mut client: burrow::SessionClient) -> BurrowResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest: Option<Snapshot> = None;

    loop {
        tokio::select! {
            snapshot = client.next_snapshot() => {
                let Some(snapshot) = snapshot else {
                    return Ok(());
                };
                println!("{}\n", render_snapshot(&snapshot));
                latest = Some(snapshot);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: leave the session
                    return client.close().await.or(Ok(()));
                };
                let Some(command) = Command::parse(&line) else {
                    println!("{}", COMMAND_HELP);
                    continue;
                };
                let input = match &latest {
                    Some(snapshot) => command.to_input(snapshot, client.id()),
                    None => Input::None,
                };
                if client.send(input).await.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

/// Prints every snapshot a secondary window receives.
async fn mirror_window(window: usize, mut snapshots: mpsc::Receiver<Snapshot>) {
    while let Some(snapshot) = snapshots.recv().await {
        println!("--- window {} ---\n{}\n", window, render_snapshot(&snapshot));
    }
}
