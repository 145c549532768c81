use std::time::Duration;

use crate::game::{EpisodeState, TickResult};

/// Totals across every episode played in this process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMetrics {
    pub episodes_played: u32,
    pub best_score: Option<i64>,
    pub best_length: usize,
    pub orbs_collected: u64,
    pub total_ticks: u64,
    score_sum: i64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&mut self, result: &TickResult) {
        if result.direction.is_some() {
            self.total_ticks += 1;
        }
        if result.info.collected_orb {
            self.orbs_collected += 1;
        }
    }

    /// Fold in an episode that has just ended (or was cut short)
    pub fn record_episode(&mut self, state: &EpisodeState) {
        self.episodes_played += 1;
        self.score_sum += state.score;
        self.best_length = self.best_length.max(state.snake.len());
        self.best_score = Some(self.best_score.map_or(state.score, |best| best.max(state.score)));
    }

    pub fn mean_score(&self) -> f64 {
        if self.episodes_played == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.episodes_played as f64
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Ticks: {} | Orbs: {} | Best score: {} | Mean score: {:.2} | Best length: {}",
            self.episodes_played,
            self.total_ticks,
            self.orbs_collected,
            self.best_score.map_or_else(|| "-".to_string(), |s| s.to_string()),
            self.mean_score(),
            self.best_length,
        )
    }
}

/// mm:ss
pub fn format_time(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// The plain-text block printed when an episode ends
pub fn format_game_over(state: &EpisodeState) -> String {
    format!(
        "Game Over\nFinal Score: {}\nElapsed Time: {:.2} seconds",
        state.score,
        state.elapsed.as_secs_f64()
    )
}
