use std::collections::BTreeSet;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::cross_number::{CrossNumber, PuzzleStatus};
use super::settings::SolverSettings;
use crate::model::Intersection;

pub const DEFAULT_MAX_STEPS: usize = 25;

/// Outcome of one propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Propagation {
    pub status: PuzzleStatus,
    /// Rounds performed.
    pub steps: usize,
    /// Whether the run stopped on the step cap rather than on a fixpoint.
    pub hit_step_cap: bool,
}

/// Narrows candidate sets without guessing.
///
/// A round first removes answers already used elsewhere (when answers are
/// unique), then makes both sides of every intersection agree on their shared
/// digit. Rounds repeat until nothing changes, the puzzle is solved or
/// contradictory, or `max_steps` rounds have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSolver {
    max_steps: usize,
    unique_answers: bool,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS, true)
    }
}

impl ConstraintSolver {
    pub fn new(max_steps: usize, unique_answers: bool) -> Self {
        Self {
            max_steps,
            unique_answers,
        }
    }

    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self::new(settings.max_steps, settings.unique_answers)
    }

    /// Revise both sides of one intersection against each other.
    ///
    /// Both sides are checked against the digits the other side offered before
    /// this call, so the order of the two updates does not matter.
    pub fn filter_intersection(puzzle: &mut CrossNumber, intersection: &Intersection) -> usize {
        let h_digits: BTreeSet<u8> = puzzle
            .candidates(intersection.horizontal)
            .iter()
            .filter_map(|h| intersection.horizontal_digit(h))
            .collect();
        let v_digits: BTreeSet<u8> = puzzle
            .candidates(intersection.vertical)
            .iter()
            .filter_map(|v| intersection.vertical_digit(v))
            .collect();

        let removed_v = puzzle.retain_candidates(intersection.vertical, |v| {
            intersection
                .vertical_digit(v)
                .is_some_and(|digit| h_digits.contains(&digit))
        });
        let removed_h = puzzle.retain_candidates(intersection.horizontal, |h| {
            intersection
                .horizontal_digit(h)
                .is_some_and(|digit| v_digits.contains(&digit))
        });

        if removed_h + removed_v > 0 {
            trace!(
                target: "constraint_solver",
                "Intersection {:?} removed {} horizontal and {} vertical candidates",
                intersection.position,
                removed_h,
                removed_v
            );
        }
        removed_h + removed_v
    }

    /// Filter every intersection once, in graph order.
    pub fn filter(puzzle: &mut CrossNumber) -> usize {
        let intersections = puzzle.intersections().to_vec();
        intersections
            .iter()
            .map(|intersection| Self::filter_intersection(puzzle, intersection))
            .sum()
    }

    /// Remove every answer pinned down by a resolved section from all unresolved sections.
    pub fn eliminate_uniques(puzzle: &mut CrossNumber) -> usize {
        let used = puzzle.uniques();
        if used.is_empty() {
            return 0;
        }
        let mut removed = 0;
        for id in puzzle.section_ids() {
            if puzzle.candidates(id).len() > 1 {
                removed += puzzle.retain_candidates(id, |candidate| !used.contains(candidate));
            }
        }
        trace!(
            target: "constraint_solver",
            "Used answers {:?} removed {} candidates",
            used,
            removed
        );
        removed
    }

    /// One propagation round.
    pub fn step(&self, puzzle: &mut CrossNumber) -> usize {
        let mut removed = 0;
        if self.unique_answers {
            removed += Self::eliminate_uniques(puzzle);
        }
        removed + Self::filter(puzzle)
    }

    pub fn solve(&self, puzzle: &mut CrossNumber) -> Propagation {
        let mut steps = 0;
        loop {
            let status = puzzle.status();
            if status != PuzzleStatus::Unresolved {
                return self.finish(puzzle, status, steps, false);
            }
            if steps == self.max_steps {
                warn!(
                    target: "constraint_solver",
                    "Max steps hit ({}), score {}",
                    self.max_steps,
                    puzzle.score()
                );
                return self.finish(puzzle, status, steps, true);
            }

            steps += 1;
            let score = puzzle.score();
            self.step(puzzle);
            trace!(target: "constraint_solver", "Option lengths: {:?}", puzzle.option_lengths());

            if puzzle.score() == score && !puzzle.is_invalid() {
                return self.finish(puzzle, puzzle.status(), steps, false);
            }
        }
    }

    fn finish(
        &self,
        puzzle: &CrossNumber,
        status: PuzzleStatus,
        steps: usize,
        hit_step_cap: bool,
    ) -> Propagation {
        debug!(
            target: "constraint_solver",
            "Propagation finished after {} steps: {:?}, score {}",
            steps,
            status,
            puzzle.score()
        );
        Propagation {
            status,
            steps,
            hit_step_cap,
        }
    }
}
