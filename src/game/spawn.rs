//! Random barrier and orb placement.

use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use super::geometry::{in_bounds, GridSize};
use super::state::{Position, Snake};

/// Scatter square barrier clusters until `coverage` of the grid is blocked.
///
/// Clusters have a random side in `1..=max_cluster` and are clipped to the
/// grid; cells under the snake are skipped. At least one free cell is always
/// left over so an orb can be placed.
pub fn generate_barriers<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    snake: &Snake,
    coverage: f64,
    max_cluster: usize,
) -> HashSet<Position> {
    let total = grid.cell_count();
    let free = total.saturating_sub(snake.len());
    let target = ((coverage * total as f64) as usize).min(free.saturating_sub(1));

    let mut barriers = HashSet::with_capacity(target);
    while barriers.len() < target {
        let side = rng.gen_range(1..=max_cluster.max(1)) as i32;
        let start = Position::new(
            rng.gen_range(0..grid.width) as i32,
            rng.gen_range(0..grid.height) as i32,
        );

        'cluster: for i in 0..side {
            for j in 0..side {
                let cell = start.moved_by(i, j);
                if in_bounds(cell, grid) && !snake.occupies(cell) {
                    barriers.insert(cell);
                }
                if barriers.len() >= target {
                    break 'cluster;
                }
            }
        }
    }

    barriers
}

/// Pick a uniformly random cell that is neither snake nor barrier
pub fn spawn_orb<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    snake: &Snake,
    barriers: &HashSet<Position>,
) -> Option<Position> {
    grid.cells()
        .filter(|cell| !snake.occupies(*cell) && !barriers.contains(cell))
        .choose(rng)
}
