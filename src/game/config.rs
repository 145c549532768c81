use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::geometry::{in_bounds, GridSize};
use super::state::{Position, Snake};

/// Settings given on the command line; each one that is set wins over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub grid_width: Option<usize>,
    pub grid_height: Option<usize>,
    pub seed: Option<u64>,
    pub tick_interval_ms: Option<u64>,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    /// Head cell of the starting snake
    pub initial_head: Position,
    /// Direction the starting snake faces; the body trails behind the head
    pub initial_direction: Direction,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Target share of grid cells covered by barriers
    pub barrier_coverage: f64,
    /// Largest side of a square barrier cluster
    pub max_barrier_cluster: usize,

    /// Score removed on every tick
    pub move_cost: i64,
    /// Score added for each orb collected
    pub orb_reward: i64,

    /// Milliseconds between ticks in watch mode
    pub tick_interval_ms: u64,
    /// Milliseconds to show the game over panel before resetting
    pub reset_delay_ms: u64,

    /// Seed for barrier, orb and fallback randomness
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_head: Position::new(5, 5),
            initial_direction: Direction::Up,
            initial_snake_length: 3,
            barrier_coverage: 0.25,
            max_barrier_cluster: 3,
            move_cost: 1,
            orb_reward: 100,
            tick_interval_ms: 200,
            reset_delay_ms: 2000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Same grid with no barriers
    pub fn without_barriers(mut self) -> Self {
        self.barrier_coverage = 0.0;
        self
    }

    /// Fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn grid(&self) -> GridSize {
        GridSize::new(self.grid_width, self.grid_height)
    }

    /// The fixed snake every episode starts with
    pub fn initial_snake(&self) -> Snake {
        Snake::new(
            self.initial_head,
            self.initial_direction,
            self.initial_snake_length,
        )
    }

    /// Apply every override that is set
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(width) = overrides.grid_width {
            self.grid_width = width;
        }
        if let Some(height) = overrides.grid_height {
            self.grid_height = height;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(tick_ms) = overrides.tick_interval_ms {
            self.tick_interval_ms = tick_ms;
        }
        self
    }

    /// Load `path` (or the defaults), apply `overrides` on top, then validate
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        }
        .with_overrides(overrides);

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        let grid = self.grid();
        if let Some(cell) = self
            .initial_snake()
            .body
            .iter()
            .find(|&&cell| !in_bounds(cell, grid))
        {
            return Err(format!(
                "initial snake cell ({}, {}) lies outside the {}x{} grid",
                cell.x, cell.y, self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length >= grid.cell_count() {
            return Err(format!(
                "initial snake of length {} leaves no room for an orb",
                self.initial_snake_length
            ));
        }

        if !(0.0..1.0).contains(&self.barrier_coverage) {
            return Err(format!(
                "barrier_coverage must be in [0, 1), got {}",
                self.barrier_coverage
            ));
        }

        if self.max_barrier_cluster == 0 {
            return Err("max_barrier_cluster must be at least 1".to_string());
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }

        Ok(())
    }
}
