pub mod backtracking_solver;
pub mod constraint_solver;
pub mod cross_number;
pub mod grid_parser;
pub mod settings;

pub use backtracking_solver::{BacktrackingSolver, SolveReport};
pub use constraint_solver::{ConstraintSolver, Propagation};
pub use cross_number::{CellValue, CrossNumber, PuzzleStatus};
pub use settings::SolverSettings;
