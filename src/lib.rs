//! Orb Snake - a snake that plays itself
//!
//! This library provides:
//! - Core game logic and the episode simulator (game module)
//! - Move policies: A* path search, greedy, and a reachability-aware hybrid (policy module)
//! - TUI rendering and keyboard input for watching a run (render, input modules)
//! - Session statistics (metrics module)
//! - Execution modes: watch in the terminal or run headless (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod policy;
pub mod render;
