//! Perfect maze generation by randomized recursive backtracking, and BFS/DFS
//! path search over the result with per-step observation and cooperative
//! cancellation.

pub mod cancel;
pub mod error;
pub mod generators;
pub mod grids;
pub mod observer;
pub mod renderer;
pub mod solvers;

pub use cancel::CancelToken;
pub use error::{MazeError, Result};
pub use generators::{generate, generate_with, Generator, RecursiveBacktracker};
pub use grids::{CellKind, Coord, GridMaze};
pub use observer::{ChannelObserver, NoopObserver, Step, StepObserver};
pub use solvers::{solve, Outcome, SearchResult, SolverKind};
