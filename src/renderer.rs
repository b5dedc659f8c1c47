use crate::grids::GridMaze;

pub const START_GLYPH: char = 'S';
pub const GOAL_GLYPH: char = 'G';

/// Draws the grid as text, one character per cell and one line per row.
/// The start and goal glyphs win over whatever state those cells are in.
pub fn render(grid: &GridMaze) -> String {
    let mut frame = String::with_capacity((grid.columns() + 1) * grid.rows());
    let start = grid.start();
    let goal = grid.goal();

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let glyph = if (row, column) == start {
                START_GLYPH
            } else if (row, column) == goal {
                GOAL_GLYPH
            } else {
                grid.kind((row, column)).into()
            };

            frame.push(glyph);
        }
        frame.push('\n');
    }

    frame
}
