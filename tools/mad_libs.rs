//! Mad Libs — pick a theme, fill in the blanks, read your story.
//!
//! Usage: mad_libs [--stories <path>] [--seed <n>] [--width <cols>] [--no-color]

use clap::Parser;
use mad_libs::core::catalog::Catalog;
use mad_libs::core::format::DISPLAY_WIDTH;
use mad_libs::core::game::{Game, GameError, GameOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// A terminal Mad Libs game.
#[derive(Parser, Debug)]
#[command(name = "mad_libs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Story catalog file (.json, or .ron).
    #[arg(short, long, default_value = "assets/stories.json")]
    stories: PathBuf,

    /// Seed for the story picker, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Display width in columns.
    #[arg(short, long, default_value_t = DISPLAY_WIDTH as u16,
          value_parser = clap::value_parser!(u16).range(20..=200))]
    width: u16,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let catalog = match Catalog::load(&cli.stories) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(path = %cli.stories.display(), error = %e, "failed to load story catalog");
            eprintln!(
                "Error: could not load stories from {}: {}",
                cli.stories.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let options = GameOptions {
        width: usize::from(cli.width),
        color: !cli.no_color,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = Game::new(&catalog, stdin.lock(), stdout.lock(), rng)
        .with_options(options)
        .play();

    match result {
        Ok(completed) => {
            tracing::info!(theme = %completed.theme, title = %completed.title, "game finished");
            ExitCode::SUCCESS
        }
        Err(GameError::InputClosed) => {
            eprintln!("\nInput closed before the story was finished.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with the game on stdout.
/// `RUST_LOG` overrides the default `warn` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
