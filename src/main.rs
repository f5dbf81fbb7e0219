use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use serde::Serialize;

use crossnumber::game::{BacktrackingSolver, CellValue, CrossNumber, PuzzleStatus, SolverSettings};
use crossnumber::model::{powers_in_range, CandidatePool, Grid, Position};

#[derive(Parser, Debug)]
#[command(author, version, about = "Solves cross-number puzzles by constraint propagation and backtracking.", long_about = None)]
struct Cli {
    /// Occupancy grid, one row of 0/1 markers per line
    grid_file: PathBuf,

    /// Whitespace separated candidate answers, instead of a range of powers
    #[arg(long, conflicts_with_all = ["power", "start", "stop"])]
    words: Option<PathBuf>,

    /// Exponent of the generated candidates
    #[arg(long, default_value_t = 2)]
    power: u32,

    /// Smallest generated candidate
    #[arg(long, default_value_t = 10)]
    start: u64,

    /// Largest generated candidate
    #[arg(long, default_value_t = 1_000_000)]
    stop: u64,

    /// JSON solver settings
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    max_steps: Option<usize>,

    #[arg(long)]
    max_iterations: Option<usize>,

    /// Let the same answer fill more than one section
    #[arg(long)]
    allow_repeats: bool,

    /// Print the grid with intersection cells marked before solving
    #[arg(long)]
    intersections: bool,

    /// Print the digit at each of these cells, e.g. `HA`, lettered A, B, C.. in order
    #[arg(long, num_args = 1..=26)]
    reveal: Vec<String>,

    /// Print a JSON report instead of the rendered grid
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    status: PuzzleStatus,
    score: usize,
    iterations: usize,
    solution: Option<BTreeMap<String, String>>,
    revealed: BTreeMap<char, Revealed>,
}

/// One answer-sheet entry.
#[derive(Debug, PartialEq, Serialize)]
struct Revealed {
    position: String,
    digit: Option<char>,
}

fn init_logging() {
    env_logger::init();
}

fn load_pool(cli: &Cli) -> Result<CandidatePool, Box<dyn std::error::Error>> {
    match &cli.words {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            Ok(CandidatePool::parse_words(&contents)?)
        }
        None => Ok(powers_in_range(cli.power, cli.start, cli.stop).collect()),
    }
}

fn load_settings(cli: &Cli) -> Result<SolverSettings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.settings {
        Some(path) => SolverSettings::load(path)?,
        None => SolverSettings::default(),
    }
    .with_env_overrides();
    if let Some(max_steps) = cli.max_steps {
        settings.max_steps = max_steps;
    }
    if let Some(max_iterations) = cli.max_iterations {
        settings.max_iterations = max_iterations;
    }
    if cli.allow_repeats {
        settings.unique_answers = false;
    }
    Ok(settings)
}

/// Digits at the requested cells, keyed by answer-sheet letter in request order.
fn reveal(
    puzzle: &CrossNumber,
    tokens: &[String],
) -> Result<BTreeMap<char, Revealed>, Box<dyn std::error::Error>> {
    let mut revealed = BTreeMap::new();
    for (idx, token) in tokens.iter().enumerate() {
        let letter = Position::index_to_symbol(idx).ok_or("at most 26 cells can be revealed")?;
        let position = Position::parse(token)?;
        let digit = match puzzle.value_at(position) {
            CellValue::Digit(digit) => Some(digit),
            CellValue::Unknown | CellValue::Block => None,
        };
        revealed.insert(
            letter,
            Revealed {
                position: position.to_string(),
                digit,
            },
        );
    }
    Ok(revealed)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let grid = Grid::parse(&fs::read_to_string(&cli.grid_file)?)?;
    let pool = load_pool(&cli)?;
    let settings = load_settings(&cli)?;
    info!("Loaded {}x{} grid and {} candidates", grid.n_rows(), grid.n_cols(), pool.len());

    let mut puzzle = CrossNumber::from_grid(&grid, pool)?;
    if cli.intersections && !cli.json {
        println!("{}", puzzle.render_intersections());
    }

    let report = BacktrackingSolver::from_settings(&settings).solve(&mut puzzle);
    let revealed = reveal(&puzzle, &cli.reveal)?;

    if cli.json {
        let report = Report {
            status: report.status,
            score: report.score,
            iterations: report.iterations,
            solution: puzzle.solution(),
            revealed,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", puzzle);
    println!(
        "{:?} after {} iterations, score {}",
        report.status, report.iterations, report.score
    );
    for (letter, entry) in revealed {
        match entry.digit {
            Some(digit) => println!("{} {} {}", letter, entry.position, digit),
            None => println!("{} {} unknown", letter, entry.position),
        }
    }
    Ok(())
}
