mod candidate_pool;
mod direction;
mod grid;
mod intersection;
mod position;
mod section;

pub use candidate_pool::{powers_in_range, CandidatePool};
pub use direction::Direction;
pub use grid::Grid;
pub use intersection::{Intersection, SectionId};
pub use position::{Position, MAX_GRID_SIZE};
pub use section::Section;
