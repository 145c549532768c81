//! Shortest path to the orb with A*
//!
//! Manhattan distance is an admissible heuristic on a 4-connected grid, so the
//! first path that reaches the orb is a shortest one. The frontier is a binary
//! heap ordered by estimated total cost; equal costs are served in insertion
//! order so the chosen path does not depend on heap internals.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use rand::RngCore;
use tracing::trace;

use super::{is_open, random_direction, Policy, TailRule};
use crate::game::{manhattan, Direction, Position, Snapshot};

/// A cell reached during the search, linked back to where it came from
struct Node {
    cell: Position,
    steps: u32,
    parent: Option<usize>,
    via: Option<Direction>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PathSearchPolicy;

impl PathSearchPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Directions from the head to the orb along a shortest open path.
    ///
    /// Every snake cell blocks, the tail included. Returns `None` when the
    /// orb cannot be reached and an empty path when the head is on it.
    pub fn find_path(&self, snapshot: &Snapshot<'_>) -> Option<Vec<Direction>> {
        let orb = snapshot.orb;
        let head = snapshot.head();

        let mut nodes = vec![Node {
            cell: head,
            steps: 0,
            parent: None,
            via: None,
        }];
        // (estimated total, insertion index); the index doubles as the arena slot
        let mut frontier = BinaryHeap::from([Reverse((manhattan(head, orb), 0usize))]);
        let mut visited = HashSet::new();

        while let Some(Reverse((_, index))) = frontier.pop() {
            let cell = nodes[index].cell;

            if cell == orb {
                return Some(walk_back(&nodes, index));
            }

            if !visited.insert(cell) {
                continue;
            }

            let steps = nodes[index].steps + 1;
            for direction in Direction::ALL {
                let neighbor = cell.moved_in_direction(direction);
                if !is_open(neighbor, snapshot, TailRule::Blocks) || visited.contains(&neighbor) {
                    continue;
                }

                let slot = nodes.len();
                nodes.push(Node {
                    cell: neighbor,
                    steps,
                    parent: Some(index),
                    via: Some(direction),
                });
                frontier.push(Reverse((steps + manhattan(neighbor, orb), slot)));
            }
        }

        None
    }
}

/// Rebuild the direction sequence that led to `index`
fn walk_back(nodes: &[Node], mut index: usize) -> Vec<Direction> {
    let mut path = Vec::with_capacity(nodes[index].steps as usize);
    while let (Some(parent), Some(via)) = (nodes[index].parent, nodes[index].via) {
        path.push(via);
        index = parent;
    }
    path.reverse();
    path
}

impl Policy for PathSearchPolicy {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn select_move(&self, snapshot: &Snapshot<'_>, rng: &mut dyn RngCore) -> Direction {
        match self.find_path(snapshot) {
            Some(path) => path.first().copied().unwrap_or(Direction::Up),
            None => {
                trace!("orb unreachable, moving at random");
                random_direction(rng)
            }
        }
    }
}
