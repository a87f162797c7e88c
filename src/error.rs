use thiserror::Error;

/// Errors raised by the board engine and its configuration.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Board cannot have more than {max} rows")]
    TooManyRows { max: usize },
    #[error("Board needs at least one mine and one safe cell")]
    InvalidMineCount,
    #[error("No flags left to place")]
    NoFlagsLeft,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
}

/// Errors raised while parsing a text command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Commands start with '/'. Use /help to list the available commands.")]
    MissingSlash,
    #[error("Unknown command '{0}'. Use /help to list the available commands.")]
    Unknown(String),
    #[error("Usage: /{0} <row> <column>, e.g. /{0} A 2")]
    MissingCoords(&'static str),
    #[error("Invalid row '{0}', expected a letter")]
    InvalidRow(String),
    #[error("Invalid column '{0}', expected a number")]
    InvalidColumn(String),
    #[error("Too many arguments for /{0}")]
    TrailingArgs(&'static str),
}

/// Errors raised by the session controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No game in progress")]
    NoActiveGame,
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, GameError>;
