use std::collections::{HashSet, VecDeque};

use crate::game::{in_bounds, Direction, Position, Snapshot};

/// Size of the open region reachable from `start`.
///
/// Breadth-first flood fill over 4-connected cells. The body minus its tail
/// and the barriers block; `start` itself always counts.
pub fn reachable_area(start: Position, snapshot: &Snapshot<'_>) -> usize {
    let mut visited: HashSet<Position> = snapshot
        .body_without_tail()
        .iter()
        .chain(snapshot.barriers.iter())
        .copied()
        .collect();
    visited.insert(start);

    let mut queue = VecDeque::from([start]);
    let mut area = 0;

    while let Some(cell) = queue.pop_front() {
        area += 1;

        for direction in Direction::ALL {
            let neighbor = cell.moved_in_direction(direction);
            if in_bounds(neighbor, snapshot.grid) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    area
}
