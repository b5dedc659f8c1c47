use crate::grids::{CellKind, Coord, Dimensions, GridMaze, Neighborhood};
use crate::observer::Step;
use crate::solvers::{Solver, SolverKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Enter,
    Search,
    Unwind,
    Done,
}

struct Frame {
    cell: Coord,
    neighbors: Neighborhood,
}

/// Backtracking search over an explicit stack. When the goal is entered the
/// stack holds the path, and unwinding it marks each cell `OnPath`.
///
/// Cells that fail stay `Visited` for the rest of the run and are never
/// re-entered, which also keeps edited mazes with cycles finite.
pub struct DepthFirst {
    start: Coord,
    goal: Coord,
    stack: Vec<Frame>,
    dims: Dimensions,
    phase: Phase,
    visited: usize,
    path: Vec<Coord>,
    found: bool,
}

impl DepthFirst {
    pub fn new(grid: &GridMaze) -> Self {
        Self {
            start: grid.start(),
            goal: grid.goal(),
            stack: Vec::new(),
            dims: grid.dims(),
            phase: Phase::Enter,
            visited: 0,
            path: Vec::new(),
            found: false,
        }
    }

    fn enter(&mut self, grid: &mut GridMaze, cell: Coord) -> Step {
        grid.mark(cell, CellKind::Visited);
        self.visited += 1;
        self.stack.push(Frame {
            cell,
            neighbors: grid.get_neighborhood_of(cell),
        });

        self.phase = if cell == self.goal {
            Phase::Unwind
        } else {
            Phase::Search
        };

        Step::new(cell, CellKind::Visited)
    }
}

impl Solver for DepthFirst {
    fn kind(&self) -> SolverKind {
        SolverKind::DFS
    }

    fn step(&mut self, grid: &mut GridMaze) -> Option<Step> {
        if self.phase != Phase::Done && grid.dims() != self.dims {
            log::error!(
                "DFS built for {:?} was stepped on a {:?} maze",
                self.dims,
                grid.dims()
            );
            self.phase = Phase::Done;
            return None;
        }

        loop {
            match self.phase {
                Phase::Enter => {
                    if !grid.kind(self.start).is_passable() {
                        log::debug!("start {:?} is a wall, nothing to search", self.start);
                        self.phase = Phase::Done;
                        return None;
                    }

                    let start = self.start;
                    return Some(self.enter(grid, start));
                }
                Phase::Search => {
                    let next = match self.stack.last_mut() {
                        Some(frame) => frame.neighbors.find(|&((_, coord), _)| {
                            matches!(grid.kind(coord), CellKind::Open | CellKind::OnPath)
                        }),
                        None => {
                            log::debug!("all reachable cells exhausted after {} nodes", self.visited);
                            self.phase = Phase::Done;
                            return None;
                        }
                    };

                    match next {
                        Some(((_, coord), _)) => return Some(self.enter(grid, coord)),
                        None => {
                            self.stack.pop();
                        }
                    }
                }
                Phase::Unwind => {
                    let frame = self.stack.pop()?;
                    grid.mark(frame.cell, CellKind::OnPath);
                    self.path.push(frame.cell);

                    if self.stack.is_empty() {
                        self.path.reverse();
                        self.found = true;
                        self.phase = Phase::Done;
                    }

                    return Some(Step::new(frame.cell, CellKind::OnPath));
                }
                Phase::Done => return None,
            }
        }
    }

    fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    fn nodes_visited(&self) -> usize {
        self.visited
    }

    fn path(&self) -> Option<&[Coord]> {
        if self.found {
            Some(&self.path)
        } else {
            None
        }
    }
}
