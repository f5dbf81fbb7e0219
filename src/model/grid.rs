use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::model::{Position, MAX_GRID_SIZE};

/// Occupancy grid of a puzzle: `true` where a digit goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Grid {
    rows: Vec<Vec<bool>>,
}

impl TryFrom<Vec<Vec<bool>>> for Grid {
    type Error = PuzzleError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<bool>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, PuzzleError> {
        let Some(first) = rows.first() else {
            return Err(PuzzleError::EmptyGrid);
        };
        let n_cols = first.len();
        if n_cols == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != n_cols {
                return Err(PuzzleError::RaggedGrid {
                    row,
                    expected: n_cols,
                    found: cells.len(),
                });
            }
        }
        if rows.len() > MAX_GRID_SIZE || n_cols > MAX_GRID_SIZE {
            return Err(PuzzleError::GridTooLarge {
                rows: rows.len(),
                cols: n_cols,
            });
        }
        Ok(Self { rows })
    }

    /// Parse a grid from text, one row per non-blank line.
    ///
    /// Rows are either compact (`0110`) or whitespace separated numbers as
    /// written by numeric array dumps (`0 1 1 0`, `1.0e+00 0.0e+00`).
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        let mut rows = Vec::new();
        for line in input.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row = rows.len();
            let tokens: Vec<&str> = if line.contains(char::is_whitespace) {
                line.split_whitespace().collect()
            } else {
                line.split("").filter(|token| !token.is_empty()).collect()
            };
            let cells = tokens
                .iter()
                .enumerate()
                .map(|(col, token)| Self::parse_marker(token, row, col))
                .collect::<Result<Vec<bool>, PuzzleError>>()?;
            rows.push(cells);
        }
        Self::from_rows(rows)
    }

    fn parse_marker(token: &str, row: usize, col: usize) -> Result<bool, PuzzleError> {
        match token.parse::<f64>() {
            Ok(value) if value == 0.0 => Ok(false),
            Ok(value) if value == 1.0 => Ok(true),
            _ => Err(PuzzleError::InvalidMarker {
                row,
                col,
                token: token.to_string(),
            }),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows[0].len()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.rows
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .copied()
            .unwrap_or(false)
    }

    /// Rows as `0`/`1` strings, the form the line parser works on.
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&cell| if cell { '1' } else { '0' }).collect())
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact() {
        let grid = Grid::parse(
            "
            1110
            1011
            ",
        )
        .unwrap();
        assert_eq!(grid.n_rows(), 2);
        assert_eq!(grid.n_cols(), 4);
        assert_eq!(grid.lines(), vec!["1110", "1011"]);
        assert!(grid.is_occupied(Position::new(1, 3)));
        assert!(!grid.is_occupied(Position::new(1, 1)));
        assert!(!grid.is_occupied(Position::new(9, 9)));
    }

    #[test]
    fn test_parse_numeric_dump() {
        let grid = Grid::parse(
            "1.000000000000000000e+00 0.000000000000000000e+00 1.000000000000000000e+00\n\
             0 1 1\n",
        )
        .unwrap();
        assert_eq!(grid.lines(), vec!["101", "011"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Grid::parse(""), Err(PuzzleError::EmptyGrid)));
        assert!(matches!(
            Grid::parse("111\n11"),
            Err(PuzzleError::RaggedGrid {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            Grid::parse("101\n1x1"),
            Err(PuzzleError::InvalidMarker { row: 1, col: 1, .. })
        ));
        assert!(matches!(
            Grid::parse("1 2 1"),
            Err(PuzzleError::InvalidMarker { row: 0, col: 1, .. })
        ));
        let wide = "1".repeat(MAX_GRID_SIZE + 1);
        assert!(matches!(
            Grid::parse(&wide),
            Err(PuzzleError::GridTooLarge { rows: 1, cols: 27 })
        ));
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(vec![vec![true, false], vec![false, true]]).unwrap();
        assert_eq!(grid.to_string(), "10\n01\n");
    }

    #[test]
    fn test_deserialize_validates() {
        let grid = Grid::parse("110\n011").unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[true,true,false],[false,true,true]]");
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);

        assert!(serde_json::from_str::<Grid>("[]").is_err());
        assert!(serde_json::from_str::<Grid>("[[]]").is_err());
        assert!(serde_json::from_str::<Grid>("[[true,true],[true]]").is_err());
    }
}
