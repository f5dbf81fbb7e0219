use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Largest supported grid dimension; coordinates are written as the letters `A..=Z`.
pub const MAX_GRID_SIZE: usize = 26;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position {
    pub row: usize, // zero-based, written as 'A'..
    pub col: usize, // zero-based, written as 'A'..
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a two letter token, row first: `"HA"` is row 7, column 0.
    pub fn parse(token: &str) -> Result<Self, PuzzleError> {
        let mut chars = token.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(row), Some(col), None) => {
                match (Self::symbol_to_index(row), Self::symbol_to_index(col)) {
                    (Some(row), Some(col)) => Ok(Self { row, col }),
                    _ => Err(PuzzleError::InvalidPosition(token.to_string())),
                }
            }
            _ => Err(PuzzleError::InvalidPosition(token.to_string())),
        }
    }

    pub fn index_to_symbol(index: usize) -> Option<char> {
        (index < MAX_GRID_SIZE).then(|| (b'A' + index as u8) as char)
    }

    pub fn symbol_to_index(symbol: char) -> Option<usize> {
        let symbol = symbol.to_ascii_uppercase();
        symbol
            .is_ascii_uppercase()
            .then(|| symbol as usize - 'A' as usize)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row = Self::index_to_symbol(self.row).unwrap_or('?');
        let col = Self::index_to_symbol(self.col).unwrap_or('?');
        write!(f, "{}{}", row, col)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
