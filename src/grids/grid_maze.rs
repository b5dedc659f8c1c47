use std::collections::VecDeque;

use crate::error::{MazeError, Result};
use crate::grids::{CellKind, Coord, Dimensions, Direction, Neighborhood};
use crate::observer::Step;

pub const MIN_DIMENSION: usize = 5;
pub const DEFAULT_DIMS: (usize, usize) = (21, 21);

/// Fixed-size block maze. Every cell is either a wall or passable, and the
/// passable cells carry the markings of the current search run.
///
/// The start is always (1, 1) and the goal is always (rows - 2, columns - 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMaze {
    dims: Dimensions,
    cells: Vec<CellKind>,
}

impl GridMaze {
    /// Allocates a grid of walls. Both dimensions must be odd and at least
    /// `MIN_DIMENSION`; nothing is allocated otherwise.
    ///
    /// The start and goal are walls too until the grid is generated, which
    /// always leaves them `Open`.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        let valid = |n: usize| n >= MIN_DIMENSION && n % 2 == 1;
        if !valid(rows) || !valid(columns) {
            return Err(MazeError::InvalidDimensions {
                rows,
                cols: columns,
            });
        }

        Ok(Self {
            cells: vec![CellKind::Wall; rows * columns],
            dims: Dimensions { rows, columns },
        })
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.dims.columns
    }

    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, column: usize) -> bool {
        self.dims.contains(row, column)
    }

    #[inline]
    pub fn start(&self) -> Coord {
        (1, 1)
    }

    #[inline]
    pub fn goal(&self) -> Coord {
        (self.dims.rows - 2, self.dims.columns - 2)
    }

    #[inline]
    pub fn is_endpoint(&self, coord: Coord) -> bool {
        coord == self.start() || coord == self.goal()
    }

    pub fn get(&self, row: usize, column: usize) -> Result<CellKind> {
        self.check_bounds(row, column)?;
        Ok(self.kind((row, column)))
    }

    /// Overwrites a cell and returns its previous state. The start and goal
    /// can never be turned into walls.
    pub fn set(&mut self, row: usize, column: usize, kind: CellKind) -> Result<CellKind> {
        self.check_bounds(row, column)?;
        if kind == CellKind::Wall && self.is_endpoint((row, column)) {
            return Err(MazeError::ProtectedCell { row, col: column });
        }

        Ok(self.mark((row, column), kind))
    }

    /// Replays an observed step onto this grid, used by renderers that keep
    /// their own copy of the maze.
    pub fn apply(&mut self, step: Step) -> Result<CellKind> {
        self.set(step.coord.0, step.coord.1, step.kind)
    }

    /// Wall editing for interactive front ends. Clears the markings of the
    /// previous search, rejects the start and goal, and only accepts `Wall`
    /// or `Open`.
    pub fn edit_cell(&mut self, row: usize, column: usize, kind: CellKind) -> Result<CellKind> {
        self.check_bounds(row, column)?;
        if kind.is_search_marking() {
            return Err(MazeError::InvalidEdit(kind));
        }
        if self.is_endpoint((row, column)) {
            return Err(MazeError::ProtectedCell { row, col: column });
        }

        self.reset_search_markings();
        Ok(self.mark((row, column), kind))
    }

    /// Flips a wall to open or anything passable back to a wall.
    pub fn toggle_wall(&mut self, row: usize, column: usize) -> Result<CellKind> {
        let kind = match self.get(row, column)? {
            CellKind::Wall => CellKind::Open,
            _ => CellKind::Wall,
        };

        self.edit_cell(row, column, kind)
    }

    /// Walls in every orthogonal neighbour of a cell, leaving the start and
    /// goal untouched. Simulates a broken maze.
    pub fn wall_off(&mut self, row: usize, column: usize) -> Result<()> {
        self.check_bounds(row, column)?;

        for ((_, coord), _) in self.get_neighborhood_of((row, column)) {
            if !self.is_endpoint(coord) {
                self.mark(coord, CellKind::Wall);
            }
        }

        Ok(())
    }

    /// Turns every `Visited`/`OnPath` cell back into `Open`.
    pub fn reset_search_markings(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_search_marking() {
                *cell = CellKind::Open;
            }
        }
    }

    pub fn fill(&mut self) {
        self.cells = vec![CellKind::Wall; self.cells.len()];
    }

    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|kind| kind.is_passable()).count()
    }

    pub fn count_of(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Flood fill over passable cells, indexed like `cells()`.
    pub fn reachable_from(&self, origin: Coord) -> Vec<bool> {
        let mut reachable = vec![false; self.cells.len()];
        if !self.in_bounds(origin.0, origin.1) || !self.kind(origin).is_passable() {
            return reachable;
        }

        let mut queue = VecDeque::new();
        reachable[self.index_of(origin)] = true;
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            for ((kind, coord), _) in self.get_neighborhood_of(cell) {
                let index = self.index_of(coord);
                if kind.is_passable() && !reachable[index] {
                    reachable[index] = true;
                    queue.push_back(coord);
                }
            }
        }

        reachable
    }

    /// Walls on a straight corridor from `from` towards `to`, first along
    /// the rows then along the columns, stopping at the first cell already
    /// in `joined`. Nothing is opened; the caller decides how.
    pub(crate) fn corridor(&self, from: Coord, to: Coord, joined: &[bool]) -> Vec<Coord> {
        let mut walls = Vec::new();
        let (mut row, mut column) = from;

        if self.kind(from) == CellKind::Wall {
            walls.push(from);
        }

        while !joined[self.index_of((row, column))] && (row, column) != to {
            if row != to.0 {
                row = if row > to.0 { row - 1 } else { row + 1 };
            } else if column > to.1 {
                column -= 1;
            } else {
                column += 1;
            }

            if self.kind((row, column)) == CellKind::Wall {
                walls.push((row, column));
            }
        }

        walls
    }

    pub fn get_neighborhood_of(&self, coord: Coord) -> Neighborhood {
        let mut neighbors = Neighborhood::new();

        for &direction in Direction::ALL.iter() {
            if let Some(next) = direction.advance(coord, 1, &self.dims) {
                *neighbors.slot_mut(direction) = Some((self.kind(next), next));
            }
        }

        neighbors
    }

    #[inline]
    pub(crate) fn index_of(&self, coord: Coord) -> usize {
        (self.dims.columns * coord.0) + coord.1
    }

    /// Unchecked read for in-bounds coordinates produced by the engines.
    /// Panics rather than wrapping on a bad index.
    #[inline]
    pub(crate) fn kind(&self, coord: Coord) -> CellKind {
        self.cells[self.index_of(coord)]
    }

    #[inline]
    pub(crate) fn mark(&mut self, coord: Coord, kind: CellKind) -> CellKind {
        let index = self.index_of(coord);
        let prev_kind = self.cells[index];
        self.cells[index] = kind;

        prev_kind
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<()> {
        if self.in_bounds(row, column) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds { row, col: column })
        }
    }
}

#[cfg(test)]
impl GridMaze {
    /// A single open room: every non-border cell passable.
    pub(crate) fn open_room(rows: usize, columns: usize) -> Self {
        let mut grid = Self::new(rows, columns).unwrap();
        for row in 1..rows - 1 {
            for column in 1..columns - 1 {
                grid.mark((row, column), CellKind::Open);
            }
        }
        grid
    }
}
