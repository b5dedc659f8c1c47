use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use futures::executor::block_on;
use futures::{future, StreamExt};

use maze_solver::grids::DEFAULT_DIMS;
use maze_solver::renderer;
use maze_solver::{
    generate_with, solve, CancelToken, ChannelObserver, GridMaze, MazeError, NoopObserver,
    Outcome, SearchResult, SolverKind,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Bfs,
    Dfs,
}

impl From<Algorithm> for SolverKind {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => SolverKind::BFS,
            Algorithm::Dfs => SolverKind::DFS,
        }
    }
}

/// Generate a perfect maze and search it from the top left to the bottom right
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Grid rows, odd and at least 5
    #[arg(long, default_value_t = DEFAULT_DIMS.0)]
    rows: usize,

    /// Grid columns, odd and at least 5
    #[arg(long, default_value_t = DEFAULT_DIMS.1)]
    cols: usize,

    /// Search algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::Bfs)]
    algorithm: Algorithm,

    /// Random seed for the carve, entropy when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run BFS and then DFS on the same maze
    #[arg(long)]
    both: bool,

    /// Draw the maze after each search
    #[arg(short, long)]
    print: bool,

    /// Redraw the maze after every step of the search
    #[arg(long)]
    trace: bool,

    /// Pause between traced steps
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// More logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("could not install Ctrl-C handler: {}", err);
    }

    let code = match run(&args, &cancel) {
        Ok(results) => exit_code(&results),
        Err(err) => {
            eprintln!("error: {:#}", err);
            error_code(&err)
        }
    };

    ExitCode::from(code)
}

const FOUND: u8 = 0;
const NOT_FOUND: u8 = 1;
const INVALID_INPUT: u8 = 2;
const INTERNAL_ERROR: u8 = 3;
const INTERRUPTED: u8 = 130;

fn exit_code(results: &[SearchResult]) -> u8 {
    if results.iter().any(SearchResult::cancelled) {
        INTERRUPTED
    } else if results.iter().all(SearchResult::success) {
        FOUND
    } else {
        NOT_FOUND
    }
}

fn error_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<MazeError>() {
        Some(MazeError::Cancelled) => INTERRUPTED,
        Some(_) => INVALID_INPUT,
        None => INTERNAL_ERROR,
    }
}

fn run(args: &Args, cancel: &CancelToken) -> anyhow::Result<Vec<SearchResult>> {
    let grid = GridMaze::new(args.rows, args.cols)?;
    let mut maze = generate_with(grid, args.seed, &mut NoopObserver, Some(cancel))?;
    log::info!("generated {}x{} maze", maze.rows(), maze.columns());

    let kinds = if args.both {
        vec![SolverKind::BFS, SolverKind::DFS]
    } else {
        vec![args.algorithm.into()]
    };

    let mut results = Vec::new();
    for kind in kinds {
        let result = if args.trace {
            let (solved, result) =
                solve_traced(maze, kind, Duration::from_millis(args.delay_ms), cancel)?;
            maze = solved;
            result
        } else {
            solve(&mut maze, kind, &mut NoopObserver, Some(cancel))
        };

        if args.print {
            print!("{}", renderer::render(&maze));
        }
        if args.print || args.verbose > 0 {
            println!("{:#}", result);
        } else {
            println!("{}", result);
        }

        let cancelled = result.outcome == Outcome::Cancelled;
        results.push(result);
        if cancelled {
            break;
        }
    }

    Ok(results)
}

/// Runs the search on a worker thread that owns the maze, and redraws a
/// local copy on this thread from the step events it sends.
fn solve_traced(
    maze: GridMaze,
    kind: SolverKind,
    delay: Duration,
    cancel: &CancelToken,
) -> anyhow::Result<(GridMaze, SearchResult)> {
    let mut view = maze.clone();
    view.reset_search_markings();

    let (mut observer, events) = ChannelObserver::new();
    let token = cancel.clone();
    let worker = thread::Builder::new()
        .name(format!("{}-solver", kind))
        .spawn(move || {
            let mut maze = maze;
            let result = solve(&mut maze, kind, &mut observer, Some(&token));
            (maze, result)
        })
        .context("failed to start solver thread")?;

    let mut count = 0usize;
    block_on(events.for_each(|step| {
        count += 1;
        if let Err(err) = view.apply(step) {
            log::error!("could not replay step {:?}: {}", step, err);
        }

        if !cancel.is_cancelled() {
            println!("{} step {}: {:?} -> {:?}", kind, count, step.coord, step.kind);
            print!("{}", renderer::render(&view));
            if delay > Duration::default() {
                thread::sleep(delay);
            }
        }

        future::ready(())
    }));

    worker
        .join()
        .map_err(|_| anyhow!("{} solver thread panicked", kind))
}

#[cfg(test)]
mod test_main {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["maze-solver", "--seed", "3"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn result(outcome: Outcome) -> SearchResult {
        SearchResult {
            algorithm: SolverKind::BFS,
            nodes_visited: 4,
            elapsed: Duration::default(),
            outcome,
            path: Vec::new(),
        }
    }

    #[test]
    fn outcomes_map_to_exit_codes() {
        let found = result(Outcome::Found);
        let not_found = result(Outcome::NotFound);
        let cancelled = result(Outcome::Cancelled);

        assert_eq!(exit_code(&[found.clone()]), 0);
        assert_eq!(exit_code(&[found.clone(), found.clone()]), 0);
        assert_eq!(exit_code(&[not_found.clone()]), 1);
        assert_eq!(exit_code(&[found.clone(), not_found]), 1);
        assert_eq!(exit_code(&[found, cancelled.clone()]), 130);
        assert_eq!(exit_code(&[cancelled]), 130);
    }

    #[test]
    fn errors_map_to_exit_codes() {
        let invalid = anyhow::Error::new(MazeError::InvalidDimensions { rows: 4, cols: 5 });
        assert_eq!(error_code(&invalid), 2);
        assert_eq!(error_code(&anyhow::Error::new(MazeError::Cancelled)), 130);
        assert_eq!(error_code(&anyhow!("solver thread panicked")), 3);
    }

    #[test]
    fn even_rows_are_invalid_input() {
        let err = run(&args(&["--rows", "4"]), &CancelToken::new()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<MazeError>(),
            Some(&MazeError::InvalidDimensions { rows: 4, cols: 21 })
        );
        assert_eq!(error_code(&err), 2);
    }

    #[test]
    fn small_columns_are_invalid_input() {
        let err = run(&args(&["--cols", "3"]), &CancelToken::new()).unwrap_err();
        assert_eq!(error_code(&err), 2);
    }

    #[test]
    fn generated_maze_is_solved_by_both() {
        let parsed = args(&["--rows", "9", "--cols", "11", "--both"]);
        let results = run(&parsed, &CancelToken::new()).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].algorithm, SolverKind::BFS);
        assert_eq!(results[1].algorithm, SolverKind::DFS);
        assert_eq!(exit_code(&results), 0);
    }

    #[test]
    fn interrupted_before_carving() {
        let token = CancelToken::new();
        token.cancel();

        let err = run(&args(&[]), &token).unwrap_err();
        assert_eq!(error_code(&err), 130);
    }

    #[test]
    fn negative_dimensions_are_rejected_by_the_parser() {
        let err = Args::try_parse_from(["maze-solver", "--rows", "-5"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
