pub mod bfs;
pub mod dfs;

pub use bfs::BreadthFirst;
pub use dfs::DepthFirst;

use std::fmt;
use std::time::{Duration, Instant};

use crate::cancel::{self, CancelToken};
use crate::grids::{Coord, GridMaze};
use crate::observer::{Step, StepObserver};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum SolverKind {
    BFS,
    DFS,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::BFS => write!(f, "BFS"),
            SolverKind::DFS => write!(f, "DFS"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Found,
    NotFound,
    Cancelled,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SearchResult {
    pub algorithm: SolverKind,
    /// Open -> Visited transitions, start included.
    pub nodes_visited: usize,
    /// Time spent inside the solver only, observers excluded.
    pub elapsed: Duration,
    pub outcome: Outcome,
    /// Start to goal, empty unless the outcome is `Found`.
    pub path: Vec<Coord>,
}

impl SearchResult {
    pub fn success(&self) -> bool {
        self.outcome == Outcome::Found
    }

    pub fn cancelled(&self) -> bool {
        self.outcome == Outcome::Cancelled
    }
}

/// `{:#}` adds a second line listing the path cells of a successful search.
impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.elapsed.as_secs_f64() * 1000.0;
        match self.outcome {
            Outcome::Found => {
                write!(
                    f,
                    "{} completed! Nodes visited: {}. Path length: {}. Time taken: {:.3} ms.",
                    self.algorithm,
                    self.nodes_visited,
                    self.path.len(),
                    millis
                )?;

                if f.alternate() {
                    let cells: Vec<String> = self
                        .path
                        .iter()
                        .map(|(row, column)| format!("({}, {})", row, column))
                        .collect();
                    write!(f, "\nPath: {}", cells.join(" -> "))?;
                }

                Ok(())
            }
            Outcome::NotFound => write!(
                f,
                "{} found no path. Nodes visited: {}. Time taken: {:.3} ms.",
                self.algorithm, self.nodes_visited, millis
            ),
            Outcome::Cancelled => write!(
                f,
                "{} cancelled after visiting {} nodes.",
                self.algorithm, self.nodes_visited
            ),
        }
    }
}

/// A search that can be advanced one cell mutation at a time.
pub trait Solver {
    fn kind(&self) -> SolverKind;

    /// Performs at most one cell mutation and reports it. Returns `None`
    /// when a step only moved internal state or the search is over.
    fn step(&mut self, grid: &mut GridMaze) -> Option<Step>;

    fn is_done(&self) -> bool;

    fn nodes_visited(&self) -> usize;

    /// The start-to-goal path once the search has succeeded.
    fn path(&self) -> Option<&[Coord]>;
}

pub fn new_solver(kind: SolverKind, grid: &GridMaze) -> Box<dyn Solver> {
    match kind {
        SolverKind::BFS => Box::new(BreadthFirst::new(grid)),
        SolverKind::DFS => Box::new(DepthFirst::new(grid)),
    }
}

/// Clears the previous search and runs `kind` from start to goal.
///
/// `observer` is called after every cell mutation and `cancel` is polled
/// before every step. Callers must not run a generator on the same grid at
/// the same time; the `&mut` borrow makes this the only writer.
pub fn solve(
    grid: &mut GridMaze,
    kind: SolverKind,
    observer: &mut dyn StepObserver,
    cancel: Option<&CancelToken>,
) -> SearchResult {
    grid.reset_search_markings();

    let mut solver = new_solver(kind, grid);
    let kind = solver.kind();
    let mut elapsed = Duration::default();

    while !solver.is_done() {
        if cancel::is_cancelled(cancel) {
            log::info!(
                "{} cancelled after {} nodes",
                kind,
                solver.nodes_visited()
            );
            return SearchResult {
                algorithm: kind,
                nodes_visited: solver.nodes_visited(),
                elapsed,
                outcome: Outcome::Cancelled,
                path: Vec::new(),
            };
        }

        let started = Instant::now();
        let step = solver.step(grid);
        elapsed += started.elapsed();

        if let Some(step) = step {
            log::trace!("{} {:?} -> {:?}", kind, step.coord, step.kind);
            observer.observe(grid, step);
        }
    }

    let (outcome, path) = match solver.path() {
        Some(path) => (Outcome::Found, path.to_vec()),
        None => (Outcome::NotFound, Vec::new()),
    };

    let result = SearchResult {
        algorithm: kind,
        nodes_visited: solver.nodes_visited(),
        elapsed,
        outcome,
        path,
    };
    log::info!("{}", result);

    result
}
