use std::cmp::Ordering;

use rand::RngCore;

use super::{is_open, random_direction, reachable_area, Policy, TailRule};
use crate::game::{manhattan, Direction, Snapshot};

/// How a single candidate move scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub direction: Direction,
    /// Cells reachable from the new head
    pub area: usize,
    /// Distance from the new head to the current tail, 0 for a one-cell snake
    pub tail_distance: u32,
    /// Distance from the new head to the orb
    pub proximity: u32,
}

impl MoveScore {
    /// Larger area wins, then a larger tail distance, then a smaller orb distance
    fn rank(&self, other: &MoveScore) -> Ordering {
        self.area
            .cmp(&other.area)
            .then(self.tail_distance.cmp(&other.tail_distance))
            .then(other.proximity.cmp(&self.proximity))
    }
}

/// One-step lookahead that prefers open space over the orb.
///
/// Moves are ranked by the area left reachable after the move, then by how
/// far the move gets from the tail, and only then by orb distance.
#[derive(Debug, Default, Clone, Copy)]
pub struct HybridPolicy;

impl HybridPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Scores for every open move, in direction order
    pub fn score_moves(&self, snapshot: &Snapshot<'_>) -> Vec<MoveScore> {
        let head = snapshot.head();
        let tail = snapshot.tail();

        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let cell = head.moved_in_direction(direction);
                if !is_open(cell, snapshot, TailRule::Vacates) {
                    return None;
                }

                Some(MoveScore {
                    direction,
                    area: reachable_area(cell, snapshot),
                    tail_distance: tail.map_or(0, |tail| manhattan(cell, tail)),
                    proximity: manhattan(cell, snapshot.orb),
                })
            })
            .collect()
    }
}

impl Policy for HybridPolicy {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn select_move(&self, snapshot: &Snapshot<'_>, rng: &mut dyn RngCore) -> Direction {
        // Strictly better replaces; an equal score keeps the earlier direction
        self.score_moves(snapshot)
            .into_iter()
            .reduce(|best, candidate| {
                if candidate.rank(&best) == Ordering::Greater {
                    candidate
                } else {
                    best
                }
            })
            .map(|best| best.direction)
            .unwrap_or_else(|| random_direction(rng))
    }
}
