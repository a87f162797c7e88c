use std::fmt::{self, Display};

use crate::error::CommandError;

/// Number of rows addressable by a single letter.
pub const MAX_ROWS: usize = 26;

/// A position on the board, as `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize, pub usize);

impl Position {
    /// Parse a row letter and a column number, e.g. `("b", "3")`.
    ///
    /// Rows are letters (`A` is row 0, case-insensitive) and columns are
    /// 0-based integers. Bounds are not checked here.
    pub fn parse(row: &str, col: &str) -> Result<Position, CommandError> {
        let row = parse_row(row).ok_or_else(|| CommandError::InvalidRow(row.to_string()))?;
        let col = col
            .parse::<usize>()
            .map_err(|_| CommandError::InvalidColumn(col.to_string()))?;
        Ok(Position(row, col))
    }

    /// Iterate over the in-bounds neighbours of this position.
    pub fn neighbors(self, rows: usize, cols: usize) -> impl Iterator<Item = Position> {
        let Position(row, col) = self;
        (-1isize..=1)
            .flat_map(|i| (-1isize..=1).map(move |j| (i, j)))
            .filter(|&delta| delta != (0, 0))
            .filter_map(move |(i, j)| {
                let row = row.checked_add_signed(i)?;
                let col = col.checked_add_signed(j)?;
                (row < rows && col < cols).then_some(Position(row, col))
            })
    }
}

/// Letter used to label a row.
pub fn row_letter(row: usize) -> char {
    debug_assert!(row < MAX_ROWS);
    char::from(b'A' + row as u8)
}

fn parse_row(s: &str) -> Option<usize> {
    let mut chars = s.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    Some((letter as u8 - b'A') as usize)
}

impl Display for Position {
    /// Display as row letter and column, e.g. `A 2`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", row_letter(self.0), self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_case_insensitively() {
        assert_eq!(Position::parse("A", "0"), Ok(Position(0, 0)));
        assert_eq!(Position::parse("c", "7"), Ok(Position(2, 7)));
        assert_eq!(Position::parse("Z", "11"), Ok(Position(25, 11)));
    }

    #[test]
    fn rejects_malformed_coords() {
        assert_eq!(
            Position::parse("1", "0"),
            Err(CommandError::InvalidRow("1".into()))
        );
        assert_eq!(
            Position::parse("AB", "0"),
            Err(CommandError::InvalidRow("AB".into()))
        );
        assert_eq!(
            Position::parse("A", "-1"),
            Err(CommandError::InvalidColumn("-1".into()))
        );
        assert_eq!(
            Position::parse("A", "x"),
            Err(CommandError::InvalidColumn("x".into()))
        );
    }

    #[test]
    fn neighbors_are_clamped_to_grid() {
        let corner: Vec<_> = Position(0, 0).neighbors(3, 3).collect();
        assert_eq!(corner, vec![Position(0, 1), Position(1, 0), Position(1, 1)]);

        assert_eq!(Position(1, 1).neighbors(3, 3).count(), 8);
        assert_eq!(Position(2, 1).neighbors(3, 3).count(), 5);
        assert_eq!(Position(0, 0).neighbors(1, 1).count(), 0);
    }

    #[test]
    fn displays_row_letter_and_column() {
        assert_eq!(Position(1, 4).to_string(), "B 4");
    }
}
