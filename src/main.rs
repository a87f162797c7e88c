use clap::Parser;
use minesweeper::*;
use std::io;
use std::num::NonZeroUsize;
use tracing_subscriber::EnvFilter;

/// Play Minesweeper in the console.
#[derive(Parser, Debug)]
#[command(name = "minesweeper", version)]
struct Args {
    /// Number of finished games to remember
    #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY)]
    history: NonZeroUsize,
    /// Seed for mine placement and hints
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    println!("Welcome to Minesweeper!");
    println!();

    let session = Session::new(args.history, args.seed);
    let stdin = io::stdin();
    let mut console = Console::new(session, stdin.lock(), io::stdout());
    console.run()?;

    Ok(())
}
