use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::model::{Direction, Position};

/// One answer run: the cells it covers, in reading order, and which way it runs.
///
/// The candidate values of a section are owned by the puzzle state
/// ([`crate::game::CrossNumber`]) so that a section itself never changes once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord")]
pub struct Section {
    positions: Vec<Position>,
    direction: Direction,
}

/// Unchecked serialized form, validated through [`Section::new`].
#[derive(Deserialize)]
struct SectionRecord {
    positions: Vec<Position>,
    direction: Direction,
}

impl TryFrom<SectionRecord> for Section {
    type Error = PuzzleError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        Section::new(record.positions, record.direction)
    }
}

impl Section {
    pub fn new(positions: Vec<Position>, direction: Direction) -> Result<Self, PuzzleError> {
        let Some(origin) = positions.first() else {
            return Err(PuzzleError::SectionTooShort {
                origin: String::from("-"),
                len: 0,
            });
        };
        if positions.len() < 2 {
            return Err(PuzzleError::SectionTooShort {
                origin: origin.to_string(),
                len: positions.len(),
            });
        }

        let label = format!("{}{}", origin, direction.suffix());
        let mut seen = BTreeSet::new();
        for position in positions.iter() {
            if !seen.insert(*position) {
                return Err(PuzzleError::RepeatedPosition {
                    label,
                    position: position.to_string(),
                });
            }
        }

        // every cell sits one step further along the direction than the last
        for (offset, position) in positions.iter().enumerate() {
            let expected = match direction {
                Direction::Horizontal => Position::new(origin.row, origin.col + offset),
                Direction::Vertical => Position::new(origin.row + offset, origin.col),
            };
            if *position != expected {
                return Err(PuzzleError::NotContiguous {
                    label,
                    position: position.to_string(),
                });
            }
        }

        Ok(Self {
            positions,
            direction,
        })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn origin(&self) -> Position {
        self.positions[0]
    }

    /// Stable key of the section, e.g. `"FB-h"`.
    pub fn label(&self) -> String {
        format!("{}{}", self.origin(), self.direction.suffix())
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.positions.contains(position)
    }

    /// Offset of `position` within this section.
    pub fn index_of(&self, position: &Position) -> Option<usize> {
        self.positions.iter().position(|p| p == position)
    }

    pub fn shared_positions(&self, other: &Section) -> Vec<Position> {
        self.positions
            .iter()
            .filter(|position| other.contains(position))
            .copied()
            .collect()
    }

    /// Whether the two sections cross in exactly one cell.
    ///
    /// Sections running the same way never form an intersection; asking is a
    /// construction error.
    pub fn intersects(&self, other: &Section) -> Result<bool, PuzzleError> {
        if self.direction == other.direction {
            return Err(PuzzleError::SameDirection {
                first: self.label(),
                second: other.label(),
            });
        }
        Ok(self.shared_positions(other).len() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(tokens: &[&str], direction: Direction) -> Section {
        let positions = tokens.iter().map(|t| Position::parse(t).unwrap()).collect();
        Section::new(positions, direction).unwrap()
    }

    #[test]
    fn test_origin() {
        let cases = [
            (vec!["AB", "BB", "CB", "DB", "EB", "FB"], Direction::Vertical, "AB"),
            (vec!["FB", "FC", "FD", "FE", "FF"], Direction::Horizontal, "FB"),
        ];
        for (tokens, direction, expected) in cases {
            let section = section(&tokens, direction);
            assert_eq!(section.origin().to_string(), expected);
        }
    }

    #[test]
    fn test_label() {
        let horizontal = section(&["FB", "FC", "FD"], Direction::Horizontal);
        let vertical = section(&["AB", "BB", "CB"], Direction::Vertical);
        assert_eq!(horizontal.label(), "FB-h");
        assert_eq!(vertical.label(), "AB-v");
    }

    #[test]
    fn test_intersects() {
        let cases = [
            (
                vec!["FB", "FC", "FD", "FE", "FF"],
                vec!["AB", "BB", "CB", "DB", "EB", "FB"],
                true,
            ),
            (
                vec!["FD", "FE", "FF"],
                vec!["AB", "BB", "CB", "DB", "EB", "FB"],
                false,
            ),
        ];
        for (horizontal, vertical, expected) in cases {
            let horizontal = section(&horizontal, Direction::Horizontal);
            let vertical = section(&vertical, Direction::Vertical);
            assert_eq!(horizontal.intersects(&vertical).unwrap(), expected);
            assert_eq!(vertical.intersects(&horizontal).unwrap(), expected);
        }
    }

    #[test]
    fn test_intersects_same_direction_is_rejected() {
        let first = section(&["AA", "AB"], Direction::Horizontal);
        let second = section(&["AB", "AC"], Direction::Horizontal);
        let result = first.intersects(&second);
        assert!(matches!(result, Err(PuzzleError::SameDirection { .. })));
    }

    #[test]
    fn test_index_of() {
        let section = section(&["HA", "HB", "HC", "HD"], Direction::Horizontal);
        assert_eq!(section.index_of(&Position::parse("HC").unwrap()), Some(2));
        assert_eq!(section.index_of(&Position::parse("IC").unwrap()), None);
        assert_eq!(section.len(), 4);
    }

    #[test]
    fn test_invalid_sections() {
        let single = Section::new(vec![Position::new(0, 0)], Direction::Vertical);
        assert!(matches!(single, Err(PuzzleError::SectionTooShort { len: 1, .. })));

        let empty = Section::new(vec![], Direction::Vertical);
        assert!(matches!(empty, Err(PuzzleError::SectionTooShort { len: 0, .. })));

        let repeated = Section::new(
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 0)],
            Direction::Horizontal,
        );
        assert!(matches!(repeated, Err(PuzzleError::RepeatedPosition { .. })));

        let cases = [
            (vec!["AA", "CD"], Direction::Horizontal, "CD"),
            (vec!["AA", "AC"], Direction::Horizontal, "AC"),
            (vec!["AA", "BA", "CD"], Direction::Vertical, "CD"),
            (vec!["AA", "AB"], Direction::Vertical, "AB"),
            (vec!["AC", "AB"], Direction::Horizontal, "AB"),
        ];
        for (tokens, direction, cell) in cases {
            let positions = tokens.iter().map(|t| Position::parse(t).unwrap()).collect();
            let result = Section::new(positions, direction);
            assert!(
                matches!(&result, Err(PuzzleError::NotContiguous { position, .. }) if position == cell),
                "{:?} {:?}",
                tokens,
                result
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let section = section(&["FB", "FC", "FD"], Direction::Horizontal);
        let json = serde_json::to_string(&section).unwrap();
        assert_eq!(serde_json::from_str::<Section>(&json).unwrap(), section);

        let empty = r#"{"positions": [], "direction": "Vertical"}"#;
        assert!(serde_json::from_str::<Section>(empty).is_err());
        let crooked = r#"{"positions": [{"row": 0, "col": 0}, {"row": 2, "col": 3}], "direction": "Horizontal"}"#;
        assert!(serde_json::from_str::<Section>(crooked).is_err());
    }
}
