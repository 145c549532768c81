//! Headless mode: play episodes back to back without a terminal UI
//!
//! Each episode runs until the snake dies or the tick limit is hit. The game
//! over block is printed for every episode and a session summary at the end.

use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::game::{EpisodeSimulator, GameConfig};
use crate::metrics::{format_game_over, SessionMetrics};
use crate::policy::Policy;

/// Settings for a headless run
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Number of episodes to play
    pub episodes: u32,
    /// Ticks after which an episode is cut off
    pub max_ticks: u64,
    /// Game configuration
    pub game_config: GameConfig,
}

impl HeadlessConfig {
    pub fn new(episodes: u32, game_config: GameConfig) -> Self {
        Self {
            episodes,
            max_ticks: 10_000,
            game_config,
        }
    }
}

pub struct HeadlessMode {
    simulator: EpisodeSimulator,
    policy: Box<dyn Policy>,
    metrics: SessionMetrics,
    episodes: u32,
    max_ticks: u64,
}

impl HeadlessMode {
    pub fn new(config: HeadlessConfig, policy: Box<dyn Policy>) -> Result<Self> {
        Ok(Self {
            simulator: EpisodeSimulator::new(config.game_config)?,
            policy,
            metrics: SessionMetrics::new(),
            episodes: config.episodes,
            max_ticks: config.max_ticks,
        })
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Run every episode, printing to stdout
    pub fn run(&mut self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Run every episode, printing to `out`
    pub fn run_to<W: Write>(&mut self, out: &mut W) -> Result<()> {
        info!(
            policy = self.policy.name(),
            episodes = self.episodes,
            max_ticks = self.max_ticks,
            "starting headless run"
        );

        for episode in 1..=self.episodes {
            if episode > 1 {
                self.simulator.reset();
            }

            let finished = self.run_episode();
            let state = self.simulator.state();
            self.metrics.record_episode(state);

            writeln!(out, "Episode {}", episode).context("Failed to write episode header")?;
            if finished {
                writeln!(out, "{}", format_game_over(state)).context("Failed to write result")?;
            } else {
                writeln!(
                    out,
                    "Tick limit reached\nFinal Score: {}\nElapsed Time: {:.2} seconds",
                    state.score,
                    state.elapsed.as_secs_f64()
                )
                .context("Failed to write result")?;
            }
            writeln!(out, "High Score: {}\n", state.high_score)
                .context("Failed to write high score")?;
        }

        writeln!(out, "{}", self.metrics.format_summary()).context("Failed to write summary")?;
        info!(summary = %self.metrics.format_summary(), "headless run complete");

        Ok(())
    }

    /// Advance until the episode ends; false if the tick limit cut it short
    fn run_episode(&mut self) -> bool {
        while self.simulator.state().ticks < self.max_ticks {
            let result = self.simulator.advance(self.policy.as_ref());
            self.metrics.record_tick(&result);

            if result.terminated {
                return true;
            }
        }

        info!(
            ticks = self.max_ticks,
            score = self.simulator.state().score,
            "episode cut off at tick limit"
        );
        false
    }
}
