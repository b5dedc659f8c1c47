use std::collections::VecDeque;

use crate::grids::{CellKind, Coord, Dimensions, GridMaze, Neighborhood};
use crate::observer::Step;
use crate::solvers::{Solver, SolverKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Seed,
    Explore,
    Trace(Coord),
    Done,
}

/// Queue-based search. Each cell's parent is fixed when it is first
/// discovered, so the traced path is a shortest one.
pub struct BreadthFirst {
    start: Coord,
    goal: Coord,
    queue: VecDeque<Coord>,
    parents: Vec<Option<Coord>>,
    dims: Dimensions,
    // dequeued cell whose neighbours are being discovered
    expanding: Option<(Coord, Neighborhood)>,
    phase: Phase,
    visited: usize,
    path: Vec<Coord>,
    found: bool,
}

impl BreadthFirst {
    pub fn new(grid: &GridMaze) -> Self {
        Self {
            start: grid.start(),
            goal: grid.goal(),
            queue: VecDeque::new(),
            parents: vec![None; grid.dims().cell_count()],
            dims: grid.dims(),
            expanding: None,
            phase: Phase::Seed,
            visited: 0,
            path: Vec::new(),
            found: false,
        }
    }

    fn parent_of(&self, coord: Coord) -> Option<Coord> {
        self.parents[coord.0 * self.dims.columns + coord.1]
    }

    fn discover(&mut self, grid: &mut GridMaze, coord: Coord, parent: Option<Coord>) -> Step {
        self.parents[coord.0 * self.dims.columns + coord.1] = parent;
        self.queue.push_back(coord);
        grid.mark(coord, CellKind::Visited);
        self.visited += 1;

        Step::new(coord, CellKind::Visited)
    }
}

impl Solver for BreadthFirst {
    fn kind(&self) -> SolverKind {
        SolverKind::BFS
    }

    fn step(&mut self, grid: &mut GridMaze) -> Option<Step> {
        if self.phase != Phase::Done && grid.dims() != self.dims {
            log::error!(
                "BFS built for {:?} was stepped on a {:?} maze",
                self.dims,
                grid.dims()
            );
            self.phase = Phase::Done;
            return None;
        }

        loop {
            match self.phase {
                Phase::Seed => {
                    if !grid.kind(self.start).is_passable() {
                        log::debug!("start {:?} is a wall, nothing to search", self.start);
                        self.phase = Phase::Done;
                        return None;
                    }

                    self.phase = Phase::Explore;
                    let start = self.start;
                    return Some(self.discover(grid, start, None));
                }
                Phase::Explore => {
                    if let Some((current, neighbors)) = self.expanding.as_mut() {
                        let current = *current;
                        let next = neighbors
                            .find(|&((_, coord), _)| grid.kind(coord) == CellKind::Open);

                        match next {
                            Some(((_, coord), _)) => {
                                return Some(self.discover(grid, coord, Some(current)));
                            }
                            None => self.expanding = None,
                        }
                        continue;
                    }

                    match self.queue.pop_front() {
                        None => {
                            log::debug!("queue exhausted after {} nodes", self.visited);
                            self.phase = Phase::Done;
                            return None;
                        }
                        Some(cell) if cell == self.goal => self.phase = Phase::Trace(cell),
                        Some(cell) => {
                            self.expanding = Some((cell, grid.get_neighborhood_of(cell)));
                        }
                    }
                }
                Phase::Trace(cell) => {
                    grid.mark(cell, CellKind::OnPath);
                    self.path.push(cell);

                    self.phase = if cell == self.start {
                        self.path.reverse();
                        self.found = true;
                        Phase::Done
                    } else {
                        match self.parent_of(cell) {
                            Some(parent) => Phase::Trace(parent),
                            None => {
                                log::error!("{:?} was reached without a parent", cell);
                                self.path.clear();
                                Phase::Done
                            }
                        }
                    };

                    return Some(Step::new(cell, CellKind::OnPath));
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
