use thiserror::Error;

use crate::grids::CellKind;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Invalid maze dimensions {rows}x{cols}, both must be odd and at least 5")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("Cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("Cell ({row}, {col}) is the start or goal and cannot be edited")]
    ProtectedCell { row: usize, col: usize },
    #[error("Cells can only be edited to Wall or Open, not {0:?}")]
    InvalidEdit(CellKind),
    #[error("Maze generation was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, MazeError>;
