use std::collections::BTreeSet;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::constraint_solver::ConstraintSolver;
use super::cross_number::{CrossNumber, PuzzleStatus};
use super::settings::SolverSettings;
use crate::error::PuzzleError;
use crate::model::SectionId;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Final state of a full solving run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub status: PuzzleStatus,
    /// Hypothesis passes performed after the initial propagation.
    pub iterations: usize,
    pub score: usize,
}

/// Depth-one hypothesis testing on top of [`ConstraintSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktrackingSolver {
    constraint_solver: ConstraintSolver,
    max_iterations: usize,
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new(ConstraintSolver::default(), DEFAULT_MAX_ITERATIONS)
    }
}

fn candidate_total(puzzle: &CrossNumber) -> usize {
    puzzle.option_lengths().iter().sum()
}

impl BacktrackingSolver {
    pub fn new(constraint_solver: ConstraintSolver, max_iterations: usize) -> Self {
        Self {
            constraint_solver,
            max_iterations,
        }
    }

    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self::new(
            ConstraintSolver::from_settings(settings),
            settings.max_iterations,
        )
    }

    pub fn constraint_solver(&self) -> &ConstraintSolver {
        &self.constraint_solver
    }

    /// Try every remaining candidate of one section on a copy of the puzzle.
    ///
    /// Candidates whose copy propagates into a contradiction are removed from
    /// `puzzle` once all of them have been tried. A copy that propagates to a
    /// full solution replaces `puzzle` straight away. Returns how many
    /// candidates disappeared from `puzzle`.
    pub fn assume(&self, puzzle: &mut CrossNumber, id: SectionId) -> usize {
        if puzzle.candidates(id).len() <= 1 {
            return 0;
        }
        let label = puzzle.section(id).label();
        let before = candidate_total(puzzle);
        let candidates: Vec<String> = puzzle.candidates(id).iter().cloned().collect();

        let mut infeasible = BTreeSet::new();
        for candidate in candidates {
            let mut hypothesis = puzzle.clone();
            hypothesis.retain_candidates(id, |option| *option == candidate);
            let propagation = self.constraint_solver.solve(&mut hypothesis);
            trace!(
                target: "backtracking",
                "Assuming {} = {}: {:?} after {} steps",
                label,
                candidate,
                propagation.status,
                propagation.steps
            );
            match propagation.status {
                PuzzleStatus::Contradiction => {
                    infeasible.insert(candidate);
                }
                PuzzleStatus::Solved => {
                    debug!(target: "backtracking", "Assuming {} = {} solves the puzzle", label, candidate);
                    *puzzle = hypothesis;
                    return before - candidate_total(puzzle);
                }
                PuzzleStatus::Unresolved => (),
            }
        }

        if !infeasible.is_empty() {
            debug!(target: "backtracking", "Ruled out {:?} for {}", infeasible, label);
        }
        puzzle.retain_candidates(id, |candidate| !infeasible.contains(candidate))
    }

    pub fn assume_label(&self, puzzle: &mut CrossNumber, label: &str) -> Result<usize, PuzzleError> {
        let id = puzzle.section_id(label)?;
        Ok(self.assume(puzzle, id))
    }

    /// Propagate, then run hypothesis passes over every section until the
    /// puzzle is solved or contradictory, a pass changes nothing, or the
    /// iteration cap is reached.
    pub fn solve(&self, puzzle: &mut CrossNumber) -> SolveReport {
        let mut status = self.constraint_solver.solve(puzzle).status;
        let mut iterations = 0;

        while status == PuzzleStatus::Unresolved && iterations < self.max_iterations {
            iterations += 1;
            let before = candidate_total(puzzle);
            for id in puzzle.section_ids() {
                self.assume(puzzle, id);
                status = self.constraint_solver.solve(puzzle).status;
                info!(
                    target: "backtracking",
                    "Iteration {}, {}: score {}",
                    iterations,
                    puzzle.section(id).label(),
                    puzzle.score()
                );
                if status != PuzzleStatus::Unresolved {
                    break;
                }
            }
            if status == PuzzleStatus::Unresolved && candidate_total(puzzle) == before {
                debug!(
                    target: "backtracking",
                    "Pass {} removed no candidates, giving up",
                    iterations
                );
                break;
            }
        }

        let report = SolveReport {
            status,
            iterations,
            score: puzzle.score(),
        };
        info!(target: "backtracking", "Finished: {:?}", report);
        report
    }
}
