//! Core game logic module for Snake
//!
//! Grid geometry, episode state and the simulator that advances it. Nothing
//! here touches the terminal, so episodes can be driven from tests or a
//! headless loop as easily as from the TUI.

pub mod action;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod spawn;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigOverrides, GameConfig};
pub use engine::{EpisodeSimulator, TickInfo, TickResult};
pub use geometry::{in_bounds, manhattan, GridSize};
pub use state::{EpisodeState, EpisodeStatus, Position, Snake, Snapshot, Termination};
