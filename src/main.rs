//! Slide Puzzle
//!
//! A 15-style puzzle where a whole row or column run slides into the empty
//! cell. Plays interactively in the terminal with mouse and keyboard, and
//! offers one-shot commands against the saved game.

mod tui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::warn;

use slide_puzzle::config::{Config, ConfigError};
use slide_puzzle::persistence::{self, PersistenceError};
use slide_puzzle::{logging, Game, PuzzleError};

/// Row and column sliding puzzle.
#[derive(Parser)]
#[command(name = "slide-puzzle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: platform config dir/slide-puzzle/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Saved game file, overriding the config.
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play in the terminal (default).
    Play,
    /// Print the saved board and move count.
    Show,
    /// Shuffle the board and reset the move count.
    Shuffle {
        /// Seed for a reproducible shuffle.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Click the tile at a cell index (row-major, from 0).
    Click { index: usize },
    /// Put the board back in order.
    Reset,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let save_path = cli.save.unwrap_or_else(|| config.save_path());
    let mut game = load_game(&config, &save_path);

    match cli.command {
        None | Some(Command::Play) => {
            tui::run(tui::App::new(game, config.gesture(), save_path))?;
            return Ok(());
        }
        Some(Command::Show) => {}
        Some(Command::Shuffle { seed }) => {
            match seed {
                Some(seed) => game.shuffle_with(&mut StdRng::seed_from_u64(seed)),
                None => game.shuffle(),
            };
            persistence::save(&save_path, &game.snapshot())?;
        }
        Some(Command::Click { index }) => {
            game.play(index)?;
            persistence::save(&save_path, &game.snapshot())?;
        }
        Some(Command::Reset) => {
            game.reset();
            persistence::save(&save_path, &game.snapshot())?;
        }
    }

    print!("{}", summary(&game));
    Ok(())
}

/// Resumes the saved game; unreadable saves count as no save at all.
fn load_game(config: &Config, save_path: &Path) -> Game {
    let saved = persistence::load(save_path).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring saved game");
        None
    });
    Game::restore(config.size, saved)
}

/// Move counter, board and a closing remark.
fn summary(game: &Game) -> String {
    let mut output = format!("Moves: {}\n{}", game.moves(), game.grid());
    if game.is_solved() {
        output.push_str("Solved!\n");
    } else if !game.grid().is_solvable() {
        output.push_str("This board cannot be solved by sliding.\n");
    }
    output
}
