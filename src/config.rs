use std::fmt::{self, Display};

use crate::error::{GameError, Result};
use crate::position::MAX_ROWS;

/// Minesweeper configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rows: usize,
    cols: usize,
    mines: usize,
}

impl Config {
    /// Create a new Config.
    ///
    /// The board must have at least one safe cell and at most one row per
    /// letter of the alphabet.
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Config> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if rows > MAX_ROWS {
            return Err(GameError::TooManyRows { max: MAX_ROWS });
        }
        if mines == 0 || mines >= rows * cols {
            return Err(GameError::InvalidMineCount);
        }
        Ok(Config { rows, cols, mines })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mines(&self) -> usize {
        self.mines
    }
}

/// Preset difficulties offered by the menus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Starter,
    Pro,
    Guru,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Starter, Difficulty::Pro, Difficulty::Guru];

    /// Look up a difficulty by its 1-based menu number.
    pub fn from_choice(choice: usize) -> Option<Difficulty> {
        Self::ALL.get(choice.checked_sub(1)?).copied()
    }

    /// Board dimensions for this difficulty as `(rows, cols, mines)`.
    pub const fn dimensions(self) -> (usize, usize, usize) {
        match self {
            Difficulty::Starter => (9, 9, 10),
            Difficulty::Pro => (10, 10, 12),
            Difficulty::Guru => (12, 12, 20),
        }
    }

    pub fn config(self) -> Config {
        let (rows, cols, mines) = self.dimensions();
        Config { rows, cols, mines }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Difficulty::Starter => "Starter",
            Difficulty::Pro => "Pro",
            Difficulty::Guru => "Guru",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid_configs() {
        for difficulty in Difficulty::ALL {
            let (rows, cols, mines) = difficulty.dimensions();
            assert_eq!(Config::new(rows, cols, mines), Ok(difficulty.config()));
        }
    }

    #[test]
    fn menu_choices_are_one_based() {
        assert_eq!(Difficulty::from_choice(0), None);
        assert_eq!(Difficulty::from_choice(1), Some(Difficulty::Starter));
        assert_eq!(Difficulty::from_choice(3), Some(Difficulty::Guru));
        assert_eq!(Difficulty::from_choice(4), None);
    }

    #[test]
    fn rejects_invalid_dimensions() {
        assert_eq!(Config::new(0, 5, 1), Err(GameError::EmptyBoard));
        assert_eq!(
            Config::new(27, 5, 1),
            Err(GameError::TooManyRows { max: 26 })
        );
        assert_eq!(Config::new(3, 3, 9), Err(GameError::InvalidMineCount));
        assert_eq!(Config::new(3, 3, 0), Err(GameError::InvalidMineCount));
        assert!(Config::new(3, 3, 8).is_ok());
    }
}
