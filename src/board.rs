//! The game board: mines, adjacency counts, reveal and flag state, and the
//! cached symbol shown for every tile.

use rand::prelude::*;
use std::collections::HashSet;
use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{GameError, Result};
use crate::position::{row_letter, Position};

/// Board on which the game is played.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<Vec<Tile>>,
    config: Config,
    remaining_flags: usize,
    cheat: bool,
    detonated: Option<Position>,
    started: Instant,
}

/// Result of toggling a flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Placed,
    Removed,
}

impl FlagOutcome {
    /// Check if a flag is now present.
    pub fn is_placed(self) -> bool {
        self == FlagOutcome::Placed
    }
}

// Construction
impl Board {
    /// Create a new Board with randomly placed mines.
    pub fn new(config: Config) -> Board {
        Board::with_rng(config, &mut thread_rng())
    }

    /// Create a new Board, drawing mine positions from `rng`.
    pub fn with_rng<R: Rng>(config: Config, rng: &mut R) -> Board {
        let mut board = Board::blank(config);
        board.place_mines(rng);
        board.count_adjacent();
        board
    }

    /// Create a Board with mines at exactly the given positions.
    ///
    /// Duplicate positions count once.
    pub fn from_mines(rows: usize, cols: usize, mines: &[Position]) -> Result<Board> {
        let unique: HashSet<_> = mines.iter().copied().collect();
        if unique.iter().any(|pos| pos.0 >= rows || pos.1 >= cols) {
            return Err(GameError::InvalidCoords);
        }
        let config = Config::new(rows, cols, unique.len())?;

        let mut board = Board::blank(config);
        for pos in unique {
            board[pos].mine = true;
        }
        board.count_adjacent();
        Ok(board)
    }

    fn blank(config: Config) -> Board {
        Board {
            tiles: vec![vec![Tile::default(); config.cols()]; config.rows()],
            config,
            remaining_flags: config.mines(),
            cheat: false,
            detonated: None,
            started: Instant::now(),
        }
    }

    /// Place mines by sampling random positions until enough distinct ones
    /// have been drawn.
    fn place_mines<R: Rng>(&mut self, rng: &mut R) {
        let mut placed = 0;
        let mut draws = 0;
        while placed < self.config.mines() {
            let pos = Position(
                rng.gen_range(0..self.rows()),
                rng.gen_range(0..self.cols()),
            );
            draws += 1;
            if !self[pos].mine {
                self[pos].mine = true;
                placed += 1;
            }
        }
        debug!(
            rows = self.rows(),
            cols = self.cols(),
            mines = placed,
            draws,
            "placed mines"
        );
    }

    fn count_adjacent(&mut self) {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let pos = Position(row, col);
                let count = pos
                    .neighbors(self.rows(), self.cols())
                    .filter(|&adj| self[adj].mine)
                    .count();
                self[pos].adjacent = count as u8;
            }
        }
    }
}

// Accessors
impl Board {
    /// Get the board height.
    pub fn rows(&self) -> usize {
        self.config.rows()
    }

    /// Get the board width.
    pub fn cols(&self) -> usize {
        self.config.cols()
    }

    pub fn total_mines(&self) -> usize {
        self.config.mines()
    }

    pub fn remaining_flags(&self) -> usize {
        self.remaining_flags
    }

    pub fn cheat_enabled(&self) -> bool {
        self.cheat
    }

    /// Check if a position lies on the board.
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.0 < self.rows() && pos.1 < self.cols()
    }

    /// Check if a position holds a mine. Out-of-bounds positions never do.
    pub fn is_mine(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|tile| tile.mine)
    }

    pub fn is_revealed(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|tile| tile.revealed)
    }

    pub fn is_flagged(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|tile| tile.flagged)
    }

    /// Number of mines around a position.
    pub fn adjacent_mines(&self, pos: Position) -> Option<u8> {
        self.get(pos).map(|tile| tile.adjacent)
    }

    /// Symbol currently displayed at a position.
    pub fn symbol(&self, pos: Position) -> Option<Symbol> {
        self.get(pos).map(|tile| tile.symbol)
    }

    /// Time since the board was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Iterate over every position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |row| (0..cols).map(move |col| Position(row, col)))
    }

    /// Borrow the tile at a position.
    fn get(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(pos.0)?.get(pos.1)
    }
}

impl Index<Position> for Board {
    type Output = Tile;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.tiles[pos.0][pos.1]
    }
}

impl IndexMut<Position> for Board {
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        &mut self.tiles[pos.0][pos.1]
    }
}

// Game logic
impl Board {
    /// Reveal a tile.
    ///
    /// Nothing happens if `pos` is out of bounds, already revealed or holds a
    /// mine. Revealing a zero also reveals its neighbours, spreading through
    /// the whole connected zero region and its border.
    ///
    /// Returns the number of newly revealed tiles.
    pub fn reveal(&mut self, pos: Position) -> usize {
        let (rows, cols) = (self.rows(), self.cols());
        let mut visited = HashSet::from([pos]);
        let mut to_visit = vec![pos];
        let mut revealed = 0;

        while let Some(pos) = to_visit.pop() {
            match self.get(pos) {
                Some(tile) if !tile.revealed && !tile.mine => {}
                _ => continue,
            }

            self[pos].revealed = true;
            self.refresh(pos);
            revealed += 1;

            if self[pos].adjacent == 0 {
                to_visit.extend(pos.neighbors(rows, cols).filter(|&adj| visited.insert(adj)));
            }
        }

        trace!(%pos, revealed, "reveal");
        revealed
    }

    /// Flag or unflag a tile.
    ///
    /// A new flag can only be placed on a hidden tile while flags remain.
    /// A flag can always be removed, even from a tile revealed under it.
    pub fn toggle_flag(&mut self, pos: Position) -> Result<FlagOutcome> {
        let tile = self.get(pos).ok_or(GameError::InvalidCoords)?;
        if tile.revealed && !tile.flagged {
            return Err(GameError::AlreadyRevealed);
        }

        let outcome = if tile.flagged {
            self.remaining_flags += 1;
            FlagOutcome::Removed
        } else {
            if self.remaining_flags == 0 {
                return Err(GameError::NoFlagsLeft);
            }
            self.remaining_flags -= 1;
            FlagOutcome::Placed
        };

        self[pos].flagged = outcome.is_placed();
        self.refresh(pos);
        Ok(outcome)
    }

    /// Reveal the whole board after the mine at `pos` went off.
    pub fn reveal_all_mines(&mut self, pos: Position) -> Result<()> {
        if !self.is_valid(pos) {
            return Err(GameError::InvalidCoords);
        }
        for tile in self.tiles.iter_mut().flatten() {
            tile.revealed = true;
        }
        self.detonated = Some(pos);
        self.refresh_all();
        debug!(%pos, "mine detonated");
        Ok(())
    }

    /// Check if the game has been won.
    ///
    /// Either every mine is flagged or every safe tile is revealed; one of
    /// the two is enough.
    pub fn check_win(&self) -> bool {
        let tiles = || self.tiles.iter().flatten();
        let all_mines_flagged = tiles().filter(|tile| tile.mine).all(|tile| tile.flagged);
        let all_safe_revealed = tiles().filter(|tile| !tile.mine).all(|tile| tile.revealed);
        all_mines_flagged || all_safe_revealed
    }

    /// Pick a random tile that is neither mined nor revealed.
    ///
    /// Returns `None` once no such tile is left.
    pub fn random_safe_position<R: Rng>(&self, rng: &mut R) -> Option<Position> {
        let available = self
            .tiles
            .iter()
            .flatten()
            .any(|tile| !tile.mine && !tile.revealed);
        if !available {
            return None;
        }

        loop {
            let pos = Position(
                rng.gen_range(0..self.rows()),
                rng.gen_range(0..self.cols()),
            );
            if !self[pos].mine && !self[pos].revealed {
                return Some(pos);
            }
        }
    }

    /// Toggle cheat mode, which shows every mine.
    ///
    /// Returns whether cheat mode is now enabled.
    pub fn toggle_cheat(&mut self) -> bool {
        self.cheat = !self.cheat;
        self.refresh_all();
        self.cheat
    }

    fn refresh(&mut self, pos: Position) {
        let symbol = if self.detonated == Some(pos) {
            Symbol::Explosion
        } else {
            self[pos].derive_symbol(self.cheat)
        };
        self[pos].symbol = symbol;
    }

    fn refresh_all(&mut self) {
        for pos in self.positions().collect::<Vec<_>>() {
            self.refresh(pos);
        }
    }
}

// Rendering
impl Board {
    /// Render the board along with the remaining flags and the given elapsed
    /// time.
    pub fn render(&self, elapsed: Duration) -> String {
        let header: String = (0..self.cols()).map(|col| format!("{col:<3}")).collect();
        let mut out = format!("X  {}", header.trim_end());
        out.push('\n');

        for (row, tiles) in self.tiles.iter().enumerate() {
            let cells: String = tiles
                .iter()
                .map(|tile| format!("{:<3}", tile.symbol.as_char()))
                .collect();
            out.push_str(&format!("{}  {}", row_letter(row), cells.trim_end()));
            out.push('\n');
        }

        out.push_str(&format!("\n\tFlags remaining: {}\n", self.remaining_flags));
        out.push_str(&format!("\tElapsed time: {}\n", format_elapsed(elapsed)));
        out
    }
}

impl Display for Board {
    /// Display the game board.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(self.elapsed()))
    }
}

/// Format a duration as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// A tile of the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tile {
    mine: bool,
    adjacent: u8,
    revealed: bool,
    flagged: bool,
    symbol: Symbol,
}

impl Tile {
    /// Work out which symbol the tile should show.
    fn derive_symbol(&self, cheat: bool) -> Symbol {
        match (self.revealed, self.mine, self.flagged) {
            (true, true, _) => Symbol::Mine,
            (true, false, true) => Symbol::Flag,
            (true, false, false) if self.adjacent == 0 => Symbol::Empty,
            (true, false, false) => Symbol::Number(self.adjacent),
            (false, _, true) => Symbol::Flag,
            (false, true, false) if cheat => Symbol::Mine,
            (false, _, false) => Symbol::Unrevealed,
        }
    }
}

/// What a tile looks like to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Symbol {
    #[default]
    Unrevealed,
    Flag,
    Empty,
    Number(u8),
    Mine,
    Explosion,
}

impl Symbol {
    /// | Symbol      | Char |
    /// | ----------- | ---- |
    /// | `Unrevealed`| `■`  |
    /// | `Flag`      | `▶`  |
    /// | `Empty`     | `□`  |
    /// | `Number(n)` | `n`  |
    /// | `Mine`      | `◆`  |
    /// | `Explosion` | `◈`  |
    pub fn as_char(self) -> char {
        match self {
            Symbol::Unrevealed => '■',
            Symbol::Flag => '▶',
            Symbol::Empty => '□',
            Symbol::Number(n) => char::from(b'0' + n),
            Symbol::Mine => '◆',
            Symbol::Explosion => '◈',
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
