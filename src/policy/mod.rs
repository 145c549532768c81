//! Move-selection policies
//!
//! Every policy looks at a read-only [`Snapshot`] of the board and returns one
//! of the four directions. Policies never fail: when they have nothing better
//! to offer they fall back to a uniformly random direction drawn from the
//! generator the simulator lends them.

pub mod greedy;
pub mod hybrid;
pub mod path_search;
pub mod reachability;

pub use greedy::GreedyPolicy;
pub use hybrid::HybridPolicy;
pub use path_search::PathSearchPolicy;
pub use reachability::reachable_area;

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::game::{in_bounds, Direction, Position, Snapshot};

/// A strategy that picks the next move
pub trait Policy {
    /// Short name for logs and the status bar
    fn name(&self) -> &'static str;

    /// Choose a direction for the current tick
    fn select_move(&self, snapshot: &Snapshot<'_>, rng: &mut dyn RngCore) -> Direction;
}

/// Which policy to run, chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Shortest path to the orb (A*)
    Astar,
    /// Step that lands closest to the orb
    Greedy,
    /// Most open space, then away from the tail, then closest to the orb
    Hybrid,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Astar => Box::new(PathSearchPolicy::new()),
            PolicyKind::Greedy => Box::new(GreedyPolicy::new()),
            PolicyKind::Hybrid => Box::new(HybridPolicy::new()),
        }
    }
}

/// Whether the tail cell counts as occupied when testing a move.
///
/// The tail normally vacates its cell as the body shifts, so the one-step
/// policies treat it as free. Path search keeps it blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailRule {
    Blocks,
    Vacates,
}

/// In bounds, off the barriers and off the body (per `tail`)
pub(crate) fn is_open(cell: Position, snapshot: &Snapshot<'_>, tail: TailRule) -> bool {
    let body = match tail {
        TailRule::Blocks => snapshot.snake,
        TailRule::Vacates => snapshot.body_without_tail(),
    };

    in_bounds(cell, snapshot.grid) && !body.contains(&cell) && !snapshot.barriers.contains(&cell)
}

/// Last-resort move: any of the four, valid or not
pub(crate) fn random_direction(rng: &mut dyn RngCore) -> Direction {
    *Direction::ALL.choose(rng).unwrap_or(&Direction::Up)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;

    use crate::game::{GridSize, Position};

    pub fn cells(points: &[(i32, i32)]) -> Vec<Position> {
        points.iter().map(|&p| Position::from(p)).collect()
    }

    pub fn cell_set(points: &[(i32, i32)]) -> HashSet<Position> {
        points.iter().map(|&p| Position::from(p)).collect()
    }

    pub fn grid(width: usize, height: usize) -> GridSize {
        GridSize::new(width, height)
    }
}
