use std::str::FromStr;

use crate::error::CommandError;
use crate::position::Position;

/// A command typed by the player during a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Open(Position),
    Flag(Position),
    Hint,
    Cheat,
    Quit,
}

/// Help text listing every command.
pub const HELP: &str = "\
=== AVAILABLE COMMANDS ===
/help : Show this list of commands.
/open <row> <column> : Open the cell at the given row/column, e.g. /open A 2.
/flag <row> <column> : Place a flag on the cell at the given row/column. If the cell is already flagged, remove the flag.
/hint : Suggest a random cell that has no mine.
/cheat : Toggle cheat mode, which shows every mine whenever the board is displayed.
/quit : Abandon the game and return to the main menu. An abandoned game is not recorded.
";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut args = s.split_whitespace();
        let name = args.next().unwrap_or_default();
        let name = name.strip_prefix('/').ok_or(CommandError::MissingSlash)?;

        let (name, command) = match name.to_ascii_lowercase().as_str() {
            "help" => ("help", Command::Help),
            "hint" => ("hint", Command::Hint),
            "cheat" => ("cheat", Command::Cheat),
            "quit" => ("quit", Command::Quit),
            "open" => ("open", Command::Open(coords("open", &mut args)?)),
            "flag" => ("flag", Command::Flag(coords("flag", &mut args)?)),
            _ => return Err(CommandError::Unknown(name.to_string())),
        };

        if args.next().is_some() {
            return Err(CommandError::TrailingArgs(name));
        }
        Ok(command)
    }
}

fn coords<'a>(
    name: &'static str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<Position, CommandError> {
    match (args.next(), args.next()) {
        (Some(row), Some(col)) => Position::parse(row, col),
        _ => Err(CommandError::MissingCoords(name)),
    }
}
