pub mod grid_maze;

pub use grid_maze::{GridMaze, DEFAULT_DIMS, MIN_DIMENSION};

/// (row, column), row 0 is the top of the maze.
pub type Coord = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

impl Dimensions {
    #[inline]
    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Direction {
    /// Fixed exploration order shared by both solvers.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Moves `distance` cells from `coord`, or `None` if that leaves the grid.
    pub fn advance(self, coord: Coord, distance: usize, dims: &Dimensions) -> Option<Coord> {
        let (row, column) = coord;

        let (n_row, n_col) = match self {
            Direction::North => (row.checked_sub(distance)?, column),
            Direction::South => (row.checked_add(distance)?, column),
            Direction::East => (row, column.checked_add(distance)?),
            Direction::West => (row, column.checked_sub(distance)?),
        };

        if dims.contains(n_row, n_col) {
            Some((n_row, n_col))
        } else {
            None
        }
    }
}

pub type Neighbor = (CellKind, Coord);

/// In-bounds orthogonal neighbours of a cell, iterated in `Direction::ALL`
/// order. Kinds are captured when the neighbourhood is built.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    pub east: Option<Neighbor>,
    pub south: Option<Neighbor>,
    pub west: Option<Neighbor>,
    pub north: Option<Neighbor>,

    counter: Option<Direction>,
}

impl Neighborhood {
    pub fn new() -> Self {
        Self {
            east: None,
            south: None,
            west: None,
            north: None,
            counter: Some(Direction::East),
        }
    }

    pub(crate) fn slot_mut(&mut self, direction: Direction) -> &mut Option<Neighbor> {
        match direction {
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
            Direction::North => &mut self.north,
        }
    }
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Neighborhood {
    type Item = (Neighbor, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.counter {
                Some(Direction::East) => {
                    self.counter = Some(Direction::South);
                    if let Some(east) = self.east {
                        return Some((east, Direction::East));
                    }
                }
                Some(Direction::South) => {
                    self.counter = Some(Direction::West);
                    if let Some(south) = self.south {
                        return Some((south, Direction::South));
                    }
                }
                Some(Direction::West) => {
                    self.counter = Some(Direction::North);
                    if let Some(west) = self.west {
                        return Some((west, Direction::West));
                    }
                }
                Some(Direction::North) => {
                    self.counter = None;
                    return self.north.map(|north| (north, Direction::North));
                }
                None => return None,
            }
        }
    }
}

/// State of a single cell. Search states refine `Open`: a cell only moves
/// Open -> Visited -> OnPath during one search run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum CellKind {
    Wall = 0,
    Open = 1,
    Visited = 2,
    OnPath = 3,
}

impl CellKind {
    #[inline]
    pub fn is_passable(self) -> bool {
        self != CellKind::Wall
    }

    #[inline]
    pub fn is_search_marking(self) -> bool {
        matches!(self, CellKind::Visited | CellKind::OnPath)
    }
}

impl Default for CellKind {
    fn default() -> Self {
        CellKind::Wall
    }
}

impl From<CellKind> for char {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Wall => '#',
            CellKind::Open => ' ',
            CellKind::Visited => '.',
            CellKind::OnPath => 'o',
        }
    }
}
