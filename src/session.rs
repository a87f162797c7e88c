//! Session controller: the player's nickname, game counters and history of
//! finished games, and the translation of commands into board operations.

use rand::prelude::*;
use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use tracing::{debug, info, instrument};

use crate::board::{Board, FlagOutcome};
use crate::command::{Command, HELP};
use crate::config::Difficulty;
use crate::error::{GameError, SessionError};
use crate::history::History;
use crate::position::Position;

/// Number of finished games remembered by default.
pub const DEFAULT_HISTORY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// State of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        self != GameStatus::Playing
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let status = match self {
            GameStatus::Playing => "In progress",
            GameStatus::Won => "Won",
            GameStatus::Lost => "Lost",
        };
        write!(f, "{status}")
    }
}

/// A finished game, as remembered by the history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    status: GameStatus,
    nickname: String,
    board: String,
}

impl GameRecord {
    fn new(game: &Game) -> GameRecord {
        GameRecord {
            status: game.status,
            nickname: game.nickname.clone(),
            board: game.board.to_string(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Snapshot of the final board.
    pub fn board(&self) -> &str {
        &self.board
    }
}

impl Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\tNickname: {}", self.nickname)?;
        writeln!(f, "\tResult: {}", self.status)?;
        writeln!(f)?;
        write!(f, "{}", self.board)
    }
}

/// What a command did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Help,
    Opened { revealed: usize },
    Detonated(Position),
    Flag(FlagOutcome),
    Hint(Option<Position>),
    Cheat(bool),
    Quit,
}

impl Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reply::Help => write!(f, "{HELP}"),
            Reply::Opened { revealed: 0 } => write!(f, "Nothing to open there."),
            Reply::Opened { revealed: 1 } => write!(f, "Opened 1 cell."),
            Reply::Opened { revealed } => write!(f, "Opened {revealed} cells."),
            Reply::Detonated(pos) => write!(f, "You hit a mine at {pos}! Game over."),
            Reply::Flag(FlagOutcome::Placed) => write!(f, "Flag placed."),
            Reply::Flag(FlagOutcome::Removed) => write!(f, "Flag removed."),
            Reply::Hint(Some(pos)) => write!(f, "Hint: cell {pos} has no mine."),
            Reply::Hint(None) => write!(f, "Hint: no safe cells left to open."),
            Reply::Cheat(true) => write!(f, "Cheat mode enabled."),
            Reply::Cheat(false) => write!(f, "Cheat mode disabled."),
            Reply::Quit => write!(f, "Game abandoned. Back to the main menu..."),
        }
    }
}

/// Result of executing a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turn {
    pub reply: Reply,
    pub status: GameStatus,
    /// History slot the finished game was saved to.
    pub saved: Option<usize>,
}

impl Turn {
    /// Check if the game ended with this turn, by result or by quitting.
    pub fn game_over(&self) -> bool {
        self.status.is_finished() || self.reply == Reply::Quit
    }
}

/// A game in progress, or the last one played.
#[derive(Debug)]
pub struct Game {
    board: Board,
    nickname: String,
    status: GameStatus,
}

impl Game {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}

/// A player's session.
#[derive(Debug)]
pub struct Session {
    game: Option<Game>,
    history: History<GameRecord>,
    games_played: usize,
    games_won: usize,
    rng: StdRng,
}

impl Session {
    /// Create a new Session remembering the last `history` games.
    ///
    /// A `seed` makes mine placement and hints reproducible.
    pub fn new(history: NonZeroUsize, seed: Option<u64>) -> Session {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Session {
            game: None,
            history: History::new(history),
            games_played: 0,
            games_won: 0,
            rng,
        }
    }

    pub fn games_played(&self) -> usize {
        self.games_played
    }

    pub fn games_won(&self) -> usize {
        self.games_won
    }

    pub fn history(&self) -> &History<GameRecord> {
        &self.history
    }

    /// The current game, or the one that just finished.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Check if a game is in progress.
    pub fn is_playing(&self) -> bool {
        self.game
            .as_ref()
            .is_some_and(|game| game.status == GameStatus::Playing)
    }

    /// Nickname given to players who don't choose one.
    pub fn default_nickname(&self) -> String {
        format!("Anonymous {}", self.games_played + 1)
    }

    /// Start a new game at the given difficulty.
    pub fn start(&mut self, difficulty: Difficulty, nickname: &str) -> &Game {
        let board = Board::with_rng(difficulty.config(), &mut self.rng);
        info!(%difficulty, "starting game");
        self.start_with(board, nickname)
    }

    /// Start a new game on a prepared board.
    pub fn start_with(&mut self, board: Board, nickname: &str) -> &Game {
        let nickname = match nickname.trim() {
            "" => self.default_nickname(),
            name => name.to_string(),
        };
        info!(
            %nickname,
            rows = board.rows(),
            cols = board.cols(),
            mines = board.total_mines(),
            "game started"
        );
        self.game.insert(Game {
            board,
            nickname,
            status: GameStatus::Playing,
        })
    }

    /// Parse and execute a line of input.
    pub fn execute_line(&mut self, line: &str) -> Result<Turn, SessionError> {
        let command = line.parse::<Command>().inspect_err(|err| {
            debug!(%err, "rejected command");
        })?;
        self.execute(command)
    }

    /// Execute a command against the current game.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: Command) -> Result<Turn, SessionError> {
        let game = self
            .game
            .as_mut()
            .filter(|game| game.status == GameStatus::Playing)
            .ok_or(SessionError::NoActiveGame)?;
        let board = &mut game.board;

        let reply = match command {
            Command::Help => Reply::Help,
            Command::Open(pos) => {
                if !board.is_valid(pos) {
                    return Err(GameError::InvalidCoords.into());
                }
                if board.is_mine(pos) {
                    board.reveal_all_mines(pos)?;
                    game.status = GameStatus::Lost;
                    let record = GameRecord::new(game);
                    let saved = self.save(record);
                    return Ok(Turn {
                        reply: Reply::Detonated(pos),
                        status: GameStatus::Lost,
                        saved: Some(saved),
                    });
                }
                Reply::Opened {
                    revealed: board.reveal(pos),
                }
            }
            Command::Flag(pos) => Reply::Flag(board.toggle_flag(pos)?),
            Command::Hint => Reply::Hint(board.random_safe_position(&mut self.rng)),
            Command::Cheat => Reply::Cheat(board.toggle_cheat()),
            Command::Quit => {
                info!(nickname = %game.nickname, "game abandoned");
                self.game = None;
                return Ok(Turn {
                    reply: Reply::Quit,
                    status: GameStatus::Playing,
                    saved: None,
                });
            }
        };

        if board.check_win() {
            game.status = GameStatus::Won;
            let record = GameRecord::new(game);
            let saved = self.save(record);
            return Ok(Turn {
                reply,
                status: GameStatus::Won,
                saved: Some(saved),
            });
        }

        Ok(Turn {
            reply,
            status: GameStatus::Playing,
            saved: None,
        })
    }

    /// Save a finished game to the history.
    fn save(&mut self, record: GameRecord) -> usize {
        self.games_played += 1;
        if record.status == GameStatus::Won {
            self.games_won += 1;
        }
        let status = record.status;
        let slot = self.history.push(record);
        info!(
            %status,
            slot,
            played = self.games_played,
            won = self.games_won,
            "game recorded"
        );
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Symbol;

    fn session(history: usize) -> Session {
        Session::new(NonZeroUsize::new(history).unwrap(), Some(5))
    }

    // Mines at A0 and C2 of a 3x3 board
    fn board() -> Board {
        Board::from_mines(3, 3, &[Position(0, 0), Position(2, 2)]).unwrap()
    }

    #[test]
    fn requires_a_game() {
        let mut session = session(3);
        assert_eq!(session.execute(Command::Help), Err(SessionError::NoActiveGame));
    }

    #[test]
    fn empty_nickname_becomes_anonymous() {
        let mut session = session(3);
        assert_eq!(session.start_with(board(), "  ").nickname(), "Anonymous 1");
        assert_eq!(session.start_with(board(), "ana").nickname(), "ana");
    }

    #[test]
    fn starts_preset_games() {
        let mut session = session(3);
        let game = session.start(Difficulty::Pro, "ana");
        assert_eq!(game.board().rows(), 10);
        assert_eq!(game.board().total_mines(), 12);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn opening_a_mine_loses_and_records() {
        let mut session = session(3);
        session.start_with(board(), "ana");

        let turn = session.execute_line("/open A 0").unwrap();
        assert_eq!(turn.reply, Reply::Detonated(Position(0, 0)));
        assert_eq!(turn.status, GameStatus::Lost);
        assert_eq!(turn.saved, Some(0));
        assert!(turn.game_over());

        let board = session.game().unwrap().board();
        assert!(board.positions().all(|pos| board.is_revealed(pos)));
        assert_eq!(board.symbol(Position(0, 0)), Some(Symbol::Explosion));
        assert_eq!(board.symbol(Position(2, 2)), Some(Symbol::Mine));

        assert_eq!(session.games_played(), 1);
        assert_eq!(session.games_won(), 0);
        let record = session.history().iter().next().unwrap();
        assert_eq!(record.status(), GameStatus::Lost);
        assert_eq!(record.nickname(), "ana");
        assert!(record.board().contains('◈'));

        assert!(!session.is_playing());
        assert_eq!(
            session.execute(Command::Hint),
            Err(SessionError::NoActiveGame)
        );
    }

    #[test]
    fn flagging_every_mine_wins() {
        let mut session = session(3);
        session.start_with(board(), "ana");

        let turn = session.execute_line("/flag a 0").unwrap();
        assert_eq!(turn.reply, Reply::Flag(FlagOutcome::Placed));
        assert!(!turn.game_over());

        let turn = session.execute_line("/flag C 2").unwrap();
        assert_eq!(turn.status, GameStatus::Won);
        assert_eq!(turn.saved, Some(0));
        assert_eq!(session.games_won(), 1);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut session = session(3);
        let board = Board::from_mines(1, 3, &[Position(0, 0)]).unwrap();
        session.start_with(board, "ana");

        let turn = session.execute(Command::Open(Position(0, 2))).unwrap();
        assert_eq!(turn.reply, Reply::Opened { revealed: 2 });
        assert_eq!(turn.status, GameStatus::Won);
    }

    #[test]
    fn out_of_bounds_leaves_board_alone() {
        let mut session = session(3);
        session.start_with(board(), "ana");

        assert_eq!(
            session.execute_line("/open D 0"),
            Err(SessionError::Game(GameError::InvalidCoords))
        );
        assert_eq!(
            session.execute_line("/flag A 3"),
            Err(SessionError::Game(GameError::InvalidCoords))
        );
        let board = session.game().unwrap().board();
        assert!(board.positions().all(|pos| !board.is_revealed(pos)));
        assert_eq!(board.remaining_flags(), 2);
        assert!(session.is_playing());
    }

    #[test]
    fn flag_budget_is_reported() {
        let mut session = session(3);
        session.start_with(board(), "ana");
        session.execute_line("/flag B 0").unwrap();
        session.execute_line("/flag B 1").unwrap();
        assert_eq!(
            session.execute_line("/flag B 2"),
            Err(SessionError::Game(GameError::NoFlagsLeft))
        );
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut session = session(3);
        session.start_with(board(), "ana");
        assert!(matches!(
            session.execute_line("/open"),
            Err(SessionError::Command(_))
        ));
    }

    #[test]
    fn hint_points_at_safe_hidden_cell() {
        let mut session = session(3);
        session.start_with(board(), "ana");
        let turn = session.execute(Command::Hint).unwrap();
        let Reply::Hint(Some(pos)) = turn.reply else {
            panic!("expected a hint, got {:?}", turn.reply);
        };
        let board = session.game().unwrap().board();
        assert!(!board.is_mine(pos));
        assert!(!board.is_revealed(pos));
    }

    #[test]
    fn cheat_toggles() {
        let mut session = session(3);
        session.start_with(board(), "ana");
        assert_eq!(session.execute(Command::Cheat).unwrap().reply, Reply::Cheat(true));
        assert_eq!(session.execute(Command::Cheat).unwrap().reply, Reply::Cheat(false));
    }

    #[test]
    fn quitting_records_nothing() {
        let mut session = session(3);
        session.start_with(board(), "ana");
        let turn = session.execute(Command::Quit).unwrap();
        assert!(turn.game_over());
        assert_eq!(turn.saved, None);
        assert!(session.game().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.games_played(), 0);
    }

    #[test]
    fn history_wraps_around() {
        let mut session = session(2);
        for name in ["a", "b", "c"] {
            session.start_with(board(), name);
            session.execute_line("/open A 0").unwrap();
        }
        let names: Vec<_> = session.history().iter().map(GameRecord::nickname).collect();
        assert_eq!(names, vec!["c", "b"]);
        assert_eq!(session.games_played(), 3);
    }

    #[test]
    fn record_display_lists_nickname_and_result() {
        let mut session = session(1);
        session.start_with(board(), "ana");
        session.execute_line("/open A 0").unwrap();
        let shown = session.history().iter().next().unwrap().to_string();
        assert!(shown.starts_with("\tNickname: ana\n\tResult: Lost\n\nX  0  1  2\n"));
    }
}
