//! Grid bounds and distances. Pure functions, no state.

use super::state::Position;

/// Width and height of the rectangular board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Iterate every cell row by row, top-left first
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Position::new(x as i32, y as i32)))
    }
}

/// True iff both coordinates lie in `[0, dimension)`
pub fn in_bounds(pos: Position, grid: GridSize) -> bool {
    pos.x >= 0 && pos.x < grid.width as i32 && pos.y >= 0 && pos.y < grid.height as i32
}

/// |dx| + |dy|
pub fn manhattan(a: Position, b: Position) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
