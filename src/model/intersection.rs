use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::model::{Direction, Position, Section};

/// Index of a section inside a puzzle's section arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub usize);

impl SectionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A cell shared by one horizontal and one vertical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intersection {
    pub horizontal: SectionId,
    pub vertical: SectionId,
    pub position: Position,
    /// Offset of `position` in the horizontal section.
    pub h_index: usize,
    /// Offset of `position` in the vertical section.
    pub v_index: usize,
}

impl Intersection {
    pub fn new(
        (horizontal_id, horizontal): (SectionId, &Section),
        (vertical_id, vertical): (SectionId, &Section),
    ) -> Result<Self, PuzzleError> {
        if horizontal.direction() != Direction::Horizontal
            || vertical.direction() != Direction::Vertical
        {
            return Err(PuzzleError::SameDirection {
                first: horizontal.label(),
                second: vertical.label(),
            });
        }

        let shared = horizontal.shared_positions(vertical);
        let [position] = shared[..] else {
            return Err(PuzzleError::SharedCellCount {
                horizontal: horizontal.label(),
                vertical: vertical.label(),
                count: shared.len(),
            });
        };

        // shared_positions only returns cells present in both sections
        let h_index = horizontal.index_of(&position).unwrap_or_default();
        let v_index = vertical.index_of(&position).unwrap_or_default();

        Ok(Self {
            horizontal: horizontal_id,
            vertical: vertical_id,
            position,
            h_index,
            v_index,
        })
    }

    /// The digit a horizontal answer puts on the shared cell.
    pub fn horizontal_digit(&self, horizontal: &str) -> Option<u8> {
        horizontal.as_bytes().get(self.h_index).copied()
    }

    /// The digit a vertical answer puts on the shared cell.
    pub fn vertical_digit(&self, vertical: &str) -> Option<u8> {
        vertical.as_bytes().get(self.v_index).copied()
    }
}
