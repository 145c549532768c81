use rand::RngCore;

use super::{is_open, random_direction, Policy, TailRule};
use crate::game::{manhattan, Direction, Snapshot};

/// One-step lookahead: take the open move that lands closest to the orb.
///
/// Only immediate collisions are avoided. The tail counts as free because it
/// moves away this tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Open moves paired with the orb distance they leave, in direction order
    pub fn candidates(&self, snapshot: &Snapshot<'_>) -> Vec<(Direction, u32)> {
        let head = snapshot.head();
        Direction::ALL
            .into_iter()
            .map(|direction| (direction, head.moved_in_direction(direction)))
            .filter(|&(_, cell)| is_open(cell, snapshot, TailRule::Vacates))
            .map(|(direction, cell)| (direction, manhattan(cell, snapshot.orb)))
            .collect()
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn select_move(&self, snapshot: &Snapshot<'_>, rng: &mut dyn RngCore) -> Direction {
        // min_by_key keeps the first of several equal minima
        self.candidates(snapshot)
            .into_iter()
            .min_by_key(|&(_, distance)| distance)
            .map(|(direction, _)| direction)
            .unwrap_or_else(|| random_direction(rng))
    }
}
