pub mod backtracker;

pub use backtracker::RecursiveBacktracker;

use crate::cancel::{self, CancelToken};
use crate::error::{MazeError, Result};
use crate::grids::GridMaze;
use crate::observer::{Step, StepObserver};

/// A maze generator that can be driven one cell at a time for animation or
/// run to completion.
pub trait Generator {
    /// Opens at most one cell and reports it. `None` once done.
    fn step_generation(&mut self) -> Option<Step>;
    fn grid(&self) -> &GridMaze;
    fn is_done(&self) -> bool;

    fn next_step(&mut self) -> &GridMaze {
        self.step_generation();
        self.grid()
    }

    /// Runs until done, notifying `observer` after every opened cell and
    /// polling `cancel` before each step.
    fn generate_maze(
        &mut self,
        observer: &mut dyn StepObserver,
        cancel: Option<&CancelToken>,
    ) -> Result<&GridMaze> {
        while !self.is_done() {
            if cancel::is_cancelled(cancel) {
                log::info!("maze generation cancelled");
                return Err(MazeError::Cancelled);
            }

            if let Some(step) = self.step_generation() {
                observer.observe(self.grid(), step);
            }
        }

        Ok(self.grid())
    }
}

/// Carves `grid` into a perfect maze. A `seed` makes the layout
/// reproducible.
pub fn generate(grid: GridMaze, seed: Option<u64>) -> GridMaze {
    let mut generator = RecursiveBacktracker::new(grid, seed);
    while !generator.is_done() {
        generator.step_generation();
    }

    generator.into_maze()
}

/// Same as `generate`, but observable and cancellable.
///
/// A cancelled carve has no maze worth handing back, so it comes back as
/// `Err(MazeError::Cancelled)`. Callers should treat that as a stop request
/// rather than a failure.
pub fn generate_with(
    grid: GridMaze,
    seed: Option<u64>,
    observer: &mut dyn StepObserver,
    cancel: Option<&CancelToken>,
) -> Result<GridMaze> {
    let mut generator = RecursiveBacktracker::new(grid, seed);
    generator.generate_maze(observer, cancel)?;

    Ok(generator.into_maze())
}
