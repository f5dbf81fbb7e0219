use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::grid_parser::parse_grid;
use crate::error::PuzzleError;
use crate::model::{CandidatePool, Direction, Grid, Intersection, Position, Section, SectionId};

/// Coarse state of a puzzle's candidate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleStatus {
    /// Every section holds exactly one candidate.
    Solved,
    /// Some section has no candidate left.
    Contradiction,
    Unresolved,
}

/// What a single grid cell currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    Digit(char),
    Unknown,
    Block,
}

/// The part of a puzzle that never changes once it is built.
#[derive(Debug, Clone, Default)]
struct Layout {
    sections: Vec<Section>,
    labels: BTreeMap<String, SectionId>,
    intersections: Vec<Intersection>,
    pool: CandidatePool,
    dimensions: Option<(usize, usize)>,
}

/// A cross-number puzzle: its sections, their intersections and the
/// candidates still open for every section.
///
/// Cloning is cheap on topology: sections and intersections are shared, only
/// the candidate sets are copied, so a clone can be narrowed without touching
/// the puzzle it came from.
#[derive(Debug, Clone)]
pub struct CrossNumber {
    layout: Rc<Layout>,
    domains: Vec<BTreeSet<String>>,
}

impl CrossNumber {
    pub fn new(pool: CandidatePool) -> Self {
        Self {
            layout: Rc::new(Layout {
                pool,
                ..Layout::default()
            }),
            domains: Vec::new(),
        }
    }

    /// Build every section of `grid` and connect them.
    pub fn from_grid(grid: &Grid, pool: CandidatePool) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::new(pool);
        Rc::make_mut(&mut puzzle.layout).dimensions = Some((grid.n_rows(), grid.n_cols()));
        for (direction, positions) in parse_grid(grid)? {
            puzzle.add_section(positions, direction)?;
        }
        let connected = puzzle.connect()?;
        debug!(
            target: "cross_number",
            "Built puzzle with {} sections and {} intersections",
            puzzle.layout.sections.len(),
            connected
        );
        Ok(puzzle)
    }

    /// Add a section; its candidates are every pool entry of matching length.
    pub fn add_section(
        &mut self,
        positions: Vec<Position>,
        direction: Direction,
    ) -> Result<SectionId, PuzzleError> {
        let section = Section::new(positions, direction)?;
        let label = section.label();
        if self.layout.labels.contains_key(&label) {
            return Err(PuzzleError::DuplicateSection(label));
        }

        let candidates = match self.layout.pool.bucket(section.len()) {
            Some(bucket) => bucket.clone(),
            None => {
                warn!(
                    target: "cross_number",
                    "No candidates of length {} for section {}",
                    section.len(),
                    label
                );
                BTreeSet::new()
            }
        };

        let layout = Rc::make_mut(&mut self.layout);
        let id = SectionId(layout.sections.len());
        layout.sections.push(section);
        layout.labels.insert(label, id);
        self.domains.push(candidates);
        Ok(id)
    }

    /// Record every intersection between a horizontal and a vertical section.
    ///
    /// Already known intersections are kept as they are; returns how many were added.
    pub fn connect(&mut self) -> Result<usize, PuzzleError> {
        let pairs: Vec<(SectionId, SectionId)> = self
            .horizontal_sections()
            .into_iter()
            .cartesian_product(self.vertical_sections())
            .collect();

        let mut added = 0;
        for (h_id, v_id) in pairs {
            let horizontal = self.section(h_id);
            let vertical = self.section(v_id);
            if !horizontal.intersects(vertical)? {
                continue;
            }
            let intersection = Intersection::new((h_id, horizontal), (v_id, vertical))?;
            if !self.layout.intersections.contains(&intersection) {
                Rc::make_mut(&mut self.layout)
                    .intersections
                    .push(intersection);
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.layout.sections[id.index()]
    }

    pub fn section_id(&self, label: &str) -> Result<SectionId, PuzzleError> {
        self.layout
            .labels
            .get(label)
            .copied()
            .ok_or_else(|| PuzzleError::UnknownSection(label.to_string()))
    }

    pub fn section_count(&self) -> usize {
        self.layout.sections.len()
    }

    /// All section ids in label order.
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.layout.labels.values().copied().collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.layout.labels.keys().map(String::as_str)
    }

    pub fn horizontal_sections(&self) -> Vec<SectionId> {
        self.sections_running(Direction::Horizontal)
    }

    pub fn vertical_sections(&self) -> Vec<SectionId> {
        self.sections_running(Direction::Vertical)
    }

    fn sections_running(&self, direction: Direction) -> Vec<SectionId> {
        self.section_ids()
            .into_iter()
            .filter(|id| self.section(*id).direction() == direction)
            .collect()
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.layout.intersections
    }

    pub fn is_intersection(&self, position: Position) -> bool {
        self.layout
            .intersections
            .iter()
            .any(|intersection| intersection.position == position)
    }

    pub fn candidates(&self, id: SectionId) -> &BTreeSet<String> {
        &self.domains[id.index()]
    }

    pub fn candidates_for(&self, label: &str) -> Result<&BTreeSet<String>, PuzzleError> {
        Ok(self.candidates(self.section_id(label)?))
    }

    /// Keep only the candidates of `id` for which `keep` holds; returns how many were dropped.
    ///
    /// This is the only way candidates change, so candidate sets never grow.
    pub fn retain_candidates<F>(&mut self, id: SectionId, keep: F) -> usize
    where
        F: FnMut(&String) -> bool,
    {
        let domain = &mut self.domains[id.index()];
        let before = domain.len();
        domain.retain(keep);
        before - domain.len()
    }

    /// Narrow a section to the given answers, e.g. a known part of the solution.
    pub fn fix<I, S>(&mut self, label: &str, options: I) -> Result<usize, PuzzleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.section_id(label)?;
        let options: BTreeSet<String> = options.into_iter().map(Into::into).collect();
        Ok(self.retain_candidates(id, |candidate| options.contains(candidate)))
    }

    pub fn option_lengths(&self) -> Vec<usize> {
        self.domains.iter().map(BTreeSet::len).collect()
    }

    /// Sum over sections of `candidates - 1`; 0 once solved.
    ///
    /// Empty candidate sets count as 0, check [`CrossNumber::is_invalid`] first.
    pub fn score(&self) -> usize {
        self.domains
            .iter()
            .map(|domain| domain.len().saturating_sub(1))
            .sum()
    }

    pub fn is_invalid(&self) -> bool {
        self.domains.iter().any(BTreeSet::is_empty)
    }

    pub fn is_solved(&self) -> bool {
        self.domains.iter().all(|domain| domain.len() == 1)
    }

    pub fn status(&self) -> PuzzleStatus {
        if self.is_invalid() {
            PuzzleStatus::Contradiction
        } else if self.is_solved() {
            PuzzleStatus::Solved
        } else {
            PuzzleStatus::Unresolved
        }
    }

    /// Answers already pinned down by some resolved section.
    pub fn uniques(&self) -> BTreeSet<String> {
        self.domains
            .iter()
            .filter(|domain| domain.len() == 1)
            .flatten()
            .cloned()
            .collect()
    }

    /// Label to answer for every section, once the puzzle is solved.
    pub fn solution(&self) -> Option<BTreeMap<String, String>> {
        if !self.is_solved() {
            return None;
        }
        self.layout
            .labels
            .iter()
            .map(|(label, id)| {
                self.candidates(*id)
                    .first()
                    .map(|value| (label.clone(), value.clone()))
            })
            .collect()
    }

    /// The digit at `position` if a section covering it is resolved.
    pub fn value_at(&self, position: Position) -> CellValue {
        let mut covered = false;
        for (idx, section) in self.layout.sections.iter().enumerate() {
            let Some(offset) = section.index_of(&position) else {
                continue;
            };
            covered = true;
            let domain = &self.domains[idx];
            if domain.len() == 1 {
                if let Some(digit) = domain.first().and_then(|value| value.chars().nth(offset)) {
                    return CellValue::Digit(digit);
                }
            }
        }
        if covered {
            CellValue::Unknown
        } else {
            CellValue::Block
        }
    }

    /// Grid size used for rendering; derived from the sections when not built from a grid.
    pub fn dimensions(&self) -> (usize, usize) {
        self.layout.dimensions.unwrap_or_else(|| {
            self.layout
                .sections
                .iter()
                .flat_map(|section| section.positions())
                .fold((0, 0), |(rows, cols), position| {
                    (rows.max(position.row + 1), cols.max(position.col + 1))
                })
        })
    }

    /// The grid with every intersection cell marked `X`.
    pub fn render_intersections(&self) -> String {
        self.render_with(|position| {
            match self.value_at(position) {
                _ if self.is_intersection(position) => String::from(" X "),
                CellValue::Block => Self::render_cell(CellValue::Block),
                _ => Self::render_cell(CellValue::Unknown),
            }
        })
    }

    fn render_cell(value: CellValue) -> String {
        match value {
            CellValue::Digit(digit) => format!(" {} ", digit),
            CellValue::Unknown => String::from("   "),
            CellValue::Block => "\u{2588}".repeat(3),
        }
    }

    fn render_with<F: Fn(Position) -> String>(&self, cell: F) -> String {
        let (n_rows, n_cols) = self.dimensions();
        let symbol = |idx: usize| Position::index_to_symbol(idx).unwrap_or('?');
        let separator = format!("{}\n", "---+".repeat(n_cols + 1));

        let mut output = String::new();
        output.push_str("   |");
        output.push_str(&(0..n_cols).map(|col| format!(" {} |", symbol(col))).join(""));
        output.push('\n');
        output.push_str(&separator);
        for row in 0..n_rows {
            output.push_str(&format!(" {} |", symbol(row)));
            output.push_str(
                &(0..n_cols)
                    .map(|col| format!("{}|", cell(Position::new(row, col))))
                    .join(""),
            );
            output.push('\n');
            output.push_str(&separator);
        }
        output
    }
}

impl std::fmt::Display for CrossNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self.render_with(|position| Self::render_cell(self.value_at(position)));
        write!(f, "{}", rendered)
    }
}
