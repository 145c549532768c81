use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::geometry::{in_bounds, GridSize};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
}

impl Snake {
    /// Create a snake whose head faces `heading`, with the rest of the body
    /// trailing behind it
    pub fn new(head: Position, heading: Direction, length: usize) -> Self {
        let mut body = vec![head];
        let back = heading.opposite();

        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back));
        }

        Self { body }
    }

    /// Build a snake from explicit cells, head first
    pub fn from_cells(cells: impl IntoIterator<Item = Position>) -> Self {
        Self {
            body: cells.into_iter().collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if position is on any segment, tail included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Translate one step: `new_head` goes in front, the tail cell is dropped
    pub fn shift_to(&mut self, new_head: Position) {
        self.body.pop();
        self.body.insert(0, new_head);
    }

    /// Grow by duplicating the tail cell; the copy separates on the next shift
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push(tail);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Head left the grid
    Wall,
    /// Head ran into a body segment
    SelfCollision,
    /// Head ran into a barrier
    Barrier,
    /// No free cell remained for a new orb
    BoardFilled,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Wall => "wall",
            Termination::SelfCollision => "self",
            Termination::Barrier => "barrier",
            Termination::BoardFilled => "board filled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Running,
    Terminated(Termination),
}

/// Complete state of one episode, plus the high score carried across resets
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeState {
    pub snake: Snake,
    pub orb: Position,
    pub barriers: HashSet<Position>,
    pub grid: GridSize,
    pub score: i64,
    pub high_score: i64,
    pub elapsed: Duration,
    pub ticks: u64,
    pub status: EpisodeStatus,
}

impl EpisodeState {
    /// Create a fresh running episode
    pub fn new(snake: Snake, orb: Position, barriers: HashSet<Position>, grid: GridSize) -> Self {
        Self {
            snake,
            orb,
            barriers,
            grid,
            score: 0,
            high_score: 0,
            elapsed: Duration::ZERO,
            ticks: 0,
            status: EpisodeStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == EpisodeStatus::Running
    }

    /// The termination cause, if the episode has ended
    pub fn termination(&self) -> Option<Termination> {
        match self.status {
            EpisodeStatus::Running => None,
            EpisodeStatus::Terminated(cause) => Some(cause),
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        in_bounds(pos, self.grid)
    }

    /// Check if a position is a barrier
    pub fn is_barrier(&self, pos: Position) -> bool {
        self.barriers.contains(&pos)
    }

    /// Read-only view handed to a policy
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake.body,
            orb: self.orb,
            grid: self.grid,
            barriers: &self.barriers,
        }
    }
}

/// Immutable board view a policy decides from
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Body cells, head first
    pub snake: &'a [Position],
    pub orb: Position,
    pub grid: GridSize,
    pub barriers: &'a HashSet<Position>,
}

impl<'a> Snapshot<'a> {
    pub fn new(
        snake: &'a [Position],
        orb: Position,
        grid: GridSize,
        barriers: &'a HashSet<Position>,
    ) -> Self {
        Self {
            snake,
            orb,
            grid,
            barriers,
        }
    }

    pub fn head(&self) -> Position {
        self.snake[0]
    }

    /// The last segment, or `None` for a one-cell snake
    pub fn tail(&self) -> Option<Position> {
        match self.snake {
            [_, .., tail] => Some(*tail),
            _ => None,
        }
    }

    /// Every segment except the last one
    pub fn body_without_tail(&self) -> &'a [Position] {
        &self.snake[..self.snake.len().saturating_sub(1)]
    }
}
