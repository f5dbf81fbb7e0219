pub mod error;
pub mod game;
pub mod model;

pub use error::PuzzleError;
pub use game::{BacktrackingSolver, ConstraintSolver, CrossNumber, PuzzleStatus, SolverSettings};
pub use model::{powers_in_range, CandidatePool, Grid, Position};
