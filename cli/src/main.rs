use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pneumatic_core::{CellType, Coord, PuzzleDefinition, PuzzleSession, StepOutcome};
use pneumatic_protocol::parse_puzzles;

mod config;
mod report;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the puzzles in a puzzle file
    List { file: PathBuf },
    /// Print a puzzle board next to its pressure field
    Show {
        file: PathBuf,
        #[command(flatten)]
        selection: Selection,
        /// Glyph rows to paint over the board before showing it
        #[arg(short, long)]
        solution: Option<PathBuf>,
    },
    /// Run a puzzle to the end and grade it, exiting with 1 on failure
    Run {
        file: PathBuf,
        #[command(flatten)]
        selection: Selection,
        /// Glyph rows to paint over the board before running; '.' and ' ' leave a cell alone
        #[arg(short, long)]
        solution: Option<PathBuf>,
        /// TOML file with simulation rules
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the board after every tick
        #[arg(long)]
        trace: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct Selection {
    /// Puzzle name, or its zero-based position in the file
    #[arg(short, long)]
    puzzle: Option<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::List { file } => {
            for (index, puzzle) in read_puzzles(&file)?.iter().enumerate() {
                println!(
                    "{index:>3}  {}  ({}x{})",
                    puzzle.name,
                    puzzle.width(),
                    puzzle.height()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Show {
            file,
            selection,
            solution,
        } => {
            let session = open_session(&file, &selection, solution.as_deref(), None)?;
            println!("[{}]", session.name());
            print!("{}", report::board(&session));
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            file,
            selection,
            solution,
            config,
            trace,
            json,
        } => {
            let mut session =
                open_session(&file, &selection, solution.as_deref(), config.as_deref())?;

            if trace {
                loop {
                    let outcome = session.step();
                    println!("tick {}", session.run().time_index());
                    print!("{}", report::board(&session));
                    if outcome.is_finished() || outcome == StepOutcome::NoChange {
                        break;
                    }
                }
            } else {
                session.run_to_end();
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report::Summary::new(&session))?);
            } else {
                report::print_summary(&session);
            }

            Ok(if session.run().correct() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn read_puzzles(path: &Path) -> Result<Vec<PuzzleDefinition>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_puzzles(&text).with_context(|| format!("parsing {}", path.display()))
}

fn select(puzzles: Vec<PuzzleDefinition>, selection: &Selection) -> Result<PuzzleDefinition> {
    let Some(wanted) = selection.puzzle.as_deref() else {
        return puzzles.into_iter().next().context("puzzle file is empty");
    };

    let by_name = puzzles.iter().position(|puzzle| puzzle.name == wanted);
    let index = match by_name {
        Some(index) => index,
        None => match wanted.parse::<usize>() {
            Ok(index) if index < puzzles.len() => index,
            _ => bail!("no puzzle named or numbered {wanted:?}"),
        },
    };
    puzzles
        .into_iter()
        .nth(index)
        .context("puzzle index out of range")
}

fn open_session(
    file: &Path,
    selection: &Selection,
    solution: Option<&Path>,
    config: Option<&Path>,
) -> Result<PuzzleSession> {
    let definition = select(read_puzzles(file)?, selection)?;
    let config = config::Config::load(config)?;
    let mut session = PuzzleSession::load(&definition, config.rules)
        .with_context(|| format!("loading puzzle {:?}", definition.name))?;

    if let Some(path) = solution {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        apply_solution(&mut session, &text)?;
    }

    Ok(session)
}

/// Paints glyph rows over the board. Protected cells are skipped with a warning.
fn apply_solution(session: &mut PuzzleSession, text: &str) -> Result<()> {
    let mut cells = Vec::new();
    for (y, row) in text.lines().enumerate() {
        for (x, glyph) in row.chars().enumerate() {
            if matches!(glyph, ' ' | '.') {
                continue;
            }
            let Some(cell) = CellType::from_glyph(glyph) else {
                bail!("solution has unknown glyph {glyph:?} at row {}, column {}", y + 1, x + 1);
            };
            let coords = (x as Coord, y as Coord);
            if session.grid_store().is_protected(coords) {
                log::warn!("solution cell {coords:?} is fixed by the puzzle, skipped");
                continue;
            }
            if !session.grid().contains(coords) {
                log::warn!("solution cell {coords:?} is outside the board, skipped");
                continue;
            }
            cells.push((coords, cell));
        }
    }
    session.paint_all(cells);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLES: &str = "\
[first]
3x1
a c|
---+
a: in[+-]
c: out[+-]

[second]
1x1
o|
-+
o: open
";

    fn definitions() -> Vec<PuzzleDefinition> {
        parse_puzzles(PUZZLES).unwrap()
    }

    fn selection(puzzle: Option<&str>) -> Selection {
        Selection {
            puzzle: puzzle.map(str::to_owned),
        }
    }

    #[test]
    fn selects_by_name_index_or_default() {
        assert_eq!(select(definitions(), &selection(None)).unwrap().name, "first");
        assert_eq!(select(definitions(), &selection(Some("second"))).unwrap().name, "second");
        assert_eq!(select(definitions(), &selection(Some("1"))).unwrap().name, "second");
        assert!(select(definitions(), &selection(Some("7"))).is_err());
    }

    #[test]
    fn solution_paints_open_cells_only() {
        let definition = select(definitions(), &selection(None)).unwrap();
        let mut session = PuzzleSession::load(&definition, Default::default()).unwrap();

        apply_solution(&mut session, "#_#\n").unwrap();

        assert_eq!(session.grid().get((1, 0)), CellType::Empty);
        assert_eq!(session.grid().get((0, 0)), CellType::Empty);
        assert_eq!(session.pressure(), &pneumatic_core::compute(session.grid()));
        assert!(session.run_to_end());
    }

    #[test]
    fn solution_rejects_unknown_glyphs() {
        let definition = select(definitions(), &selection(None)).unwrap();
        let mut session = PuzzleSession::load(&definition, Default::default()).unwrap();

        assert!(apply_solution(&mut session, "?").is_err());
    }
}
