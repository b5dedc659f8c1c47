use std::collections::VecDeque;

use rand::prelude::*;

use crate::generators::Generator;
use crate::grids::{CellKind, Coord, Direction, GridMaze};
use crate::observer::Step;

/// A room whose shuffled directions are still being tried.
struct Frame {
    cell: Coord,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied();
        self.next += 1;
        direction
    }
}

/// Randomized depth-first carving over the odd-coordinate rooms, with an
/// explicit frame stack in place of recursion.
pub struct RecursiveBacktracker {
    grid: GridMaze,
    rng: StdRng,
    stack: Vec<Frame>,
    // carved but not yet applied, one is applied per step_generation
    queued: VecDeque<Step>,
    started: bool,
    sealed: bool,
    done: bool,
}

impl RecursiveBacktracker {
    /// Takes over `grid` and fills it with walls.
    pub fn new(grid: GridMaze, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng(grid, rng)
    }

    pub fn with_rng(mut grid: GridMaze, rng: StdRng) -> Self {
        grid.fill();
        log::debug!(
            "carving {}x{} maze from {:?}",
            grid.rows(),
            grid.columns(),
            grid.start()
        );

        Self {
            grid,
            rng,
            stack: Vec::new(),
            queued: VecDeque::new(),
            started: false,
            sealed: false,
            done: false,
        }
    }

    pub fn into_maze(self) -> GridMaze {
        self.grid
    }

    fn open(&mut self, coord: Coord) {
        if self.grid.kind(coord) != CellKind::Open {
            self.queued.push_back(Step::new(coord, CellKind::Open));
        }
    }

    fn enter(&mut self, room: Coord) {
        self.open(room);

        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.rng);
        self.stack.push(Frame {
            cell: room,
            directions,
            next: 0,
        });
    }

    /// The room two cells away, if it lies in the interior and is untouched.
    fn carvable(&self, from: Coord, direction: Direction) -> Option<Coord> {
        let dims = self.grid.dims();
        let (row, column) = direction.advance(from, 2, &dims)?;

        let interior = (1..=dims.rows - 2).contains(&row) && (1..=dims.columns - 2).contains(&column);
        if interior && self.grid.kind((row, column)) == CellKind::Wall {
            Some((row, column))
        } else {
            None
        }
    }

    /// One unit of work: start, try one direction of the top frame, or
    /// finish.
    fn advance(&mut self) {
        if !self.started {
            self.started = true;
            let start = self.grid.start();
            self.enter(start);
            return;
        }

        let top = self
            .stack
            .last_mut()
            .map(|frame| (frame.cell, frame.next_direction()));

        match top {
            None => self.finish(),
            Some((_, None)) => {
                self.stack.pop();
            }
            Some((from, Some(direction))) => {
                if let Some(room) = self.carvable(from, direction) {
                    let passage = ((from.0 + room.0) / 2, (from.1 + room.1) / 2);
                    self.open(passage);
                    self.enter(room);
                }
            }
        }
    }

    /// Forces both endpoints open, then once those are applied makes sure
    /// the goal is reachable.
    fn finish(&mut self) {
        let start = self.grid.start();
        let goal = self.grid.goal();
        if !self.sealed {
            self.sealed = true;
            self.open(start);
            self.open(goal);
            return;
        }

        let joined = self.grid.reachable_from(start);
        if !joined[self.grid.index_of(goal)] {
            log::warn!(
                "goal {:?} was not reached while carving, opening a corridor to it",
                goal
            );
            for coord in self.grid.corridor(goal, start, &joined) {
                self.queued.push_back(Step::new(coord, CellKind::Open));
            }
        }

        log::debug!(
            "carved {} passable cells in a {}x{} maze",
            self.grid.passable_count() + self.queued.len(),
            self.grid.rows(),
            self.grid.columns()
        );
        self.done = true;
    }
}

impl Generator for RecursiveBacktracker {
    fn step_generation(&mut self) -> Option<Step> {
        while self.queued.is_empty() && !self.done {
            self.advance();
        }

        let step = self.queued.pop_front()?;
        self.grid.mark(step.coord, step.kind);

        Some(step)
    }

    fn grid(&self) -> &GridMaze {
        &self.grid
    }

    fn is_done(&self) -> bool {
        self.done && self.queued.is_empty()
    }
}

#[cfg(test)]
mod test_backtracker {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::error::MazeError;
    use crate::generators::{generate, generate_with};
    use crate::observer::NoopObserver;

    const SIZES: [(usize, usize); 5] = [(5, 5), (7, 9), (21, 21), (31, 15), (9, 41)];

    fn carve(rows: usize, columns: usize, seed: u64) -> GridMaze {
        generate(GridMaze::new(rows, columns).unwrap(), Some(seed))
    }

    fn room_count(grid: &GridMaze) -> usize {
        ((grid.rows() - 1) / 2) * ((grid.columns() - 1) / 2)
    }

    #[test]
    fn every_open_cell_is_reachable_from_start() {
        for &(rows, columns) in SIZES.iter() {
            for seed in 0..25 {
                let grid = carve(rows, columns, seed);
                let reachable = grid.reachable_from(grid.start());

                for (index, kind) in grid.cells().iter().enumerate() {
                    assert_eq!(
                        kind.is_passable(),
                        reachable[index],
                        "{}x{} seed {} cell {}",
                        rows,
                        columns,
                        seed,
                        index
                    );
                }
                assert!(reachable[grid.index_of(grid.goal())]);
            }
        }
    }

    #[test]
    fn carve_is_a_spanning_tree_over_rooms() {
        for &(rows, columns) in SIZES.iter() {
            for seed in 0..25 {
                let grid = carve(rows, columns, seed);

                let mut rooms = 0;
                let mut passages = 0;
                for row in 0..rows {
                    for column in 0..columns {
                        let open = grid.kind((row, column)).is_passable();
                        match (row % 2, column % 2) {
                            (1, 1) => {
                                assert!(open, "room ({}, {}) left as wall", row, column);
                                rooms += 1;
                            }
                            (0, 0) => assert!(!open, "pillar ({}, {}) opened", row, column),
                            _ if open => passages += 1,
                            _ => {}
                        }
                    }
                }

                assert_eq!(rooms, room_count(&grid));
                assert_eq!(passages, rooms - 1, "{}x{} seed {}", rows, columns, seed);
            }
        }
    }

    #[test]
    fn border_stays_walled() {
        let grid = carve(21, 21, 7);
        for index in 0..21 {
            assert_eq!(grid.kind((0, index)), CellKind::Wall);
            assert_eq!(grid.kind((20, index)), CellKind::Wall);
            assert_eq!(grid.kind((index, 0)), CellKind::Wall);
            assert_eq!(grid.kind((index, 20)), CellKind::Wall);
        }
    }

    #[test]
    fn seed_fixes_the_layout() {
        assert_eq!(carve(21, 21, 42), carve(21, 21, 42));

        let layouts: Vec<GridMaze> = (0..10).map(|seed| carve(21, 21, seed)).collect();
        assert!(layouts.iter().any(|grid| grid != &layouts[0]));
    }

    #[test]
    fn discards_previous_contents() {
        let mut grid = GridMaze::open_room(9, 9);
        grid.mark((2, 2), CellKind::Visited);

        let carved = generate(grid, Some(3));
        assert_eq!(carved, carve(9, 9, 3));
    }

    #[test]
    fn one_step_per_opened_cell() {
        let mut generator = RecursiveBacktracker::new(GridMaze::new(15, 11).unwrap(), Some(9));
        let mut steps = Vec::new();
        while !generator.is_done() {
            if let Some(step) = generator.step_generation() {
                steps.push(step);
            }
        }

        let grid = generator.into_maze();
        assert_eq!(steps[0], Step::new(grid.start(), CellKind::Open));
        assert_eq!(steps.len(), grid.passable_count());
        assert!(steps.iter().all(|step| step.kind == CellKind::Open));
        assert_eq!(grid, carve(15, 11, 9));
    }

    #[test]
    fn next_step_grows_the_maze() {
        let mut generator = RecursiveBacktracker::new(GridMaze::new(7, 7).unwrap(), Some(1));
        assert_eq!(generator.next_step().passable_count(), 1);

        let mut last = 1;
        while !generator.is_done() {
            let count = generator.next_step().passable_count();
            assert!(count >= last);
            last = count;
        }
        assert_eq!(last, 2 * 9 - 1);
    }

    #[test]
    fn observer_sees_every_cell() {
        let mut count = 0;
        let grid = generate_with(
            GridMaze::new(11, 11).unwrap(),
            Some(5),
            &mut |grid: &GridMaze, step: Step| {
                assert_eq!(grid.kind(step.coord), CellKind::Open);
                count += 1;
            },
            None,
        )
        .unwrap();

        assert_eq!(count, grid.passable_count());
    }

    #[test]
    fn grid_matches_events_so_far() {
        let mut events = 0;
        generate_with(
            GridMaze::new(21, 21).unwrap(),
            Some(11),
            &mut |grid: &GridMaze, _: Step| {
                events += 1;
                assert_eq!(grid.passable_count(), events);
            },
            None,
        )
        .unwrap();

        assert_eq!(events, carve(21, 21, 11).passable_count());
    }

    #[test]
    fn each_step_opens_exactly_one_cell() {
        let mut generator = RecursiveBacktracker::new(GridMaze::new(9, 13).unwrap(), Some(6));
        let mut last = 0;
        while !generator.is_done() {
            let opened = generator.step_generation().is_some() as usize;
            let count = generator.grid().passable_count();
            assert_eq!(count, last + opened);
            last = count;
        }
    }

    #[test]
    fn cancelled_generation_stops() {
        let token = CancelToken::new();
        token.cancel();

        let result = generate_with(
            GridMaze::new(21, 21).unwrap(),
            Some(1),
            &mut NoopObserver,
            Some(&token),
        );
        assert_eq!(result, Err(MazeError::Cancelled));
    }

    #[test]
    fn cancel_mid_carve() {
        let token = CancelToken::new();
        let handle = token.clone();
        let mut generator = RecursiveBacktracker::new(GridMaze::new(21, 21).unwrap(), Some(2));
        let mut seen = 0;

        let result = generator.generate_maze(
            &mut |_: &GridMaze, _: Step| {
                seen += 1;
                if seen == 9 {
                    handle.cancel();
                }
            },
            Some(&token),
        );

        assert_eq!(result.err(), Some(MazeError::Cancelled));
        assert!(!generator.is_done());
        assert_eq!(generator.grid().passable_count(), 9);
    }
}
