//! # Minesweeper
//!
//! `minesweeper` is a library to handle the logic of the video game of the same name,
//! along with the session bookkeeping and text front-end used to play it from a console.

pub use board::{format_elapsed, Board, FlagOutcome, Symbol, Tile};
pub use command::{Command, HELP};
pub use config::{Config, Difficulty};
pub use console::Console;
pub use error::{CommandError, GameError, Result, SessionError};
pub use history::History;
pub use position::{row_letter, Position, MAX_ROWS};
pub use session::{Game, GameRecord, GameStatus, Reply, Session, Turn, DEFAULT_HISTORY};

mod board;
mod command;
mod config;
mod console;
mod error;
mod history;
mod position;
mod session;
