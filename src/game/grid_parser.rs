//! Turns occupancy lines into the cell sequences of answer sections.
//!
//! Every step works on a single row of `0`/`1` markers. Columns are handled by
//! transposing the grid and re-running the row logic.

use log::trace;

use crate::error::PuzzleError;
use crate::model::{Direction, Grid, Position, MAX_GRID_SIZE};

/// Zero out every `1` that has no `1` neighbour on the same line.
///
/// Only runs of two or more cells can hold an answer.
pub fn section_filter(line: &str) -> String {
    let cells = line.as_bytes();
    cells
        .iter()
        .enumerate()
        .map(|(idx, &cell)| {
            let left = idx > 0 && cells[idx - 1] == b'1';
            let right = cells.get(idx + 1) == Some(&b'1');
            if cell == b'1' && !left && !right {
                '0'
            } else {
                cell as char
            }
        })
        .collect()
}

/// Replace each `1` with the letter of its own offset in the line, everything else with a blank.
///
/// `"011101110"` becomes `" BCD FGH "`.
pub fn replace_section_indexes(line: &str) -> String {
    line.chars()
        .enumerate()
        .map(|(idx, cell)| match (cell, Position::index_to_symbol(idx)) {
            ('1', Some(symbol)) => symbol,
            _ => ' ',
        })
        .collect()
}

/// The cells of every section on one line.
///
/// `line_index` is the fixed coordinate of the line: its row for horizontal
/// sections, its column for vertical ones.
pub fn section_indexes(line: &str, line_index: usize, direction: Direction) -> Vec<Vec<Position>> {
    replace_section_indexes(&section_filter(line))
        .split_whitespace()
        .map(|run| {
            run.chars()
                .filter_map(Position::symbol_to_index)
                .map(|idx| match direction {
                    Direction::Horizontal => Position::new(line_index, idx),
                    Direction::Vertical => Position::new(idx, line_index),
                })
                .collect()
        })
        .collect()
}

pub fn transpose_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let width = lines
        .iter()
        .map(|line| line.as_ref().len())
        .min()
        .unwrap_or(0);
    (0..width)
        .map(|col| {
            lines
                .iter()
                .map(|line| line.as_ref().as_bytes()[col] as char)
                .collect()
        })
        .collect()
}

/// Every section running in `direction`, given the grid's rows.
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    direction: Direction,
) -> Result<Vec<Vec<Position>>, PuzzleError> {
    let lines: Vec<String> = match direction {
        Direction::Horizontal => lines.iter().map(|line| line.as_ref().to_string()).collect(),
        Direction::Vertical => transpose_lines(lines),
    };

    let width = lines.iter().map(String::len).max().unwrap_or(0);
    if lines.len() > MAX_GRID_SIZE || width > MAX_GRID_SIZE {
        return Err(PuzzleError::GridTooLarge {
            rows: lines.len(),
            cols: width,
        });
    }

    let sections: Vec<Vec<Position>> = lines
        .iter()
        .enumerate()
        .flat_map(|(line_index, line)| section_indexes(line, line_index, direction))
        .collect();
    trace!(
        target: "grid_parser",
        "Parsed {} {} sections: {:?}",
        sections.len(),
        direction,
        sections
    );
    Ok(sections)
}

/// Sections of a whole grid, horizontal ones first.
pub fn parse_grid(grid: &Grid) -> Result<Vec<(Direction, Vec<Position>)>, PuzzleError> {
    let lines = grid.lines();
    let mut sections = Vec::new();
    for direction in Direction::all() {
        sections.extend(
            parse_lines(&lines, direction)?
                .into_iter()
                .map(|positions| (direction, positions)),
        );
    }
    Ok(sections)
}
