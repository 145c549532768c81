//! Watch mode: the autopilot plays in the terminal
//!
//! The chosen policy drives the snake at a fixed tick rate. When an episode
//! ends the game over panel stays up for the configured reset delay, then a
//! new episode starts with the high score carried over.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};
use tokio::time::{interval, Interval};

use crate::game::{EpisodeSimulator, EpisodeState, GameConfig};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::policy::Policy;
use crate::render::{Overlay, Renderer};

/// Playback speed relative to the configured tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// Half speed
    Slow,
    /// The configured tick interval
    Normal,
    /// Four times faster
    Fast,
    /// Twelve times faster
    VeryFast,
}

impl PlaybackSpeed {
    /// Tick interval for this speed given the configured one
    pub fn tick_interval(&self, base: Duration) -> Duration {
        let interval = match self {
            Self::Slow => base * 2,
            Self::Normal => base,
            Self::Fast => base / 4,
            Self::VeryFast => base / 12,
        };
        interval.max(Duration::from_millis(1))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode {
    simulator: EpisodeSimulator,
    policy: Box<dyn Policy>,
    renderer: Renderer,
    input_handler: InputHandler,
    metrics: SessionMetrics,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    /// 1-based number of the episode on screen
    episode: u32,
    /// When the current episode ended, if it has
    ended_at: Option<Instant>,
}

impl WatchMode {
    pub fn new(config: GameConfig, policy: Box<dyn Policy>) -> Result<Self> {
        Ok(Self {
            simulator: EpisodeSimulator::new(config)?,
            policy,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            metrics: SessionMetrics::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            episode: 1,
            ended_at: None,
        })
    }

    pub fn state(&self) -> &EpisodeState {
        self.simulator.state()
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.on_tick(Instant::now());
                    }
                }

                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        let overlay = Overlay {
                            policy: self.policy.name(),
                            episode: self.episode,
                            speed: self.speed.as_str(),
                            paused: self.paused,
                        };
                        self.renderer.render(frame, self.simulator.state(), &overlay);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance the episode, or start the next one once the reset delay has passed
    fn on_tick(&mut self, now: Instant) {
        match self.ended_at {
            None => {
                let result = self.simulator.advance(self.policy.as_ref());
                self.metrics.record_tick(&result);

                if result.terminated {
                    self.metrics.record_episode(self.simulator.state());
                    self.ended_at = Some(now);
                }
            }
            Some(ended_at) => {
                let delay = Duration::from_millis(self.simulator.config().reset_delay_ms);
                if now.duration_since(ended_at) >= delay {
                    self.start_next_episode();
                }
            }
        }
    }

    fn start_next_episode(&mut self) {
        self.simulator.reset();
        self.episode += 1;
        self.ended_at = None;
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::Speed(speed) => {
                    self.speed = speed;
                    *tick_timer = interval(self.tick_interval());
                }
                KeyAction::Restart => {
                    if self.ended_at.is_none() {
                        self.metrics.record_episode(self.simulator.state());
                    }
                    self.start_next_episode();
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn tick_interval(&self) -> Duration {
        let base = Duration::from_millis(self.simulator.config().tick_interval_ms);
        self.speed.tick_interval(base)
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
