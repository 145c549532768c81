use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{EpisodeState, Position};
use crate::metrics::format_time;

/// Watch-mode details shown around the board
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub policy: &'a str,
    pub episode: u32,
    pub speed: &'a str,
    pub paused: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &EpisodeState, overlay: &Overlay<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, overlay);
        frame.render_widget(stats, chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_running() {
            let grid = self.render_grid(game_area, state, overlay);
            frame.render_widget(grid, game_area);
        } else {
            let game_over = self.render_game_over(state);
            frame.render_widget(game_over, game_area);
        }

        let controls = self.render_controls(overlay);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(
        &self,
        _area: Rect,
        state: &EpisodeState,
        overlay: &Overlay<'_>,
    ) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid.height);

        for y in 0..state.grid.height {
            let mut spans = Vec::with_capacity(state.grid.width);

            for x in 0..state.grid.width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.orb {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if state.is_barrier(pos) {
                    Span::styled("# ", Style::default().fg(Color::Gray))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if overlay.paused {
            format!(" Snake [{}] PAUSED ", overlay.policy)
        } else {
            format!(" Snake [{}] ", overlay.policy)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &EpisodeState, overlay: &Overlay<'_>) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High Score: ", label),
            Span::styled(state.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(format_time(state.elapsed), value),
            Span::raw("    "),
            Span::styled("Episode: ", label),
            Span::styled(overlay.episode.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &EpisodeState) -> Paragraph<'_> {
        let cause = state.termination().map_or("", |cause| cause.as_str());

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::styled(
                format!("({})", cause),
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Elapsed Time: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:.2} s", state.elapsed.as_secs_f64()),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Restarting...",
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, overlay: &Overlay<'_>) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" speed ({}) | ", overlay.speed)),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, EpisodeStatus, GridSize, Snake, Termination};
    use ratatui::{backend::TestBackend, Terminal};
    use std::collections::HashSet;

    fn screen_text(state: &EpisodeState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let overlay = Overlay {
            policy: "hybrid",
            episode: 3,
            speed: "Normal",
            paused: false,
        };

        terminal
            .draw(|frame| Renderer::new().render(frame, state, &overlay))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn sample_state() -> EpisodeState {
        let mut barriers = HashSet::new();
        barriers.insert(Position::new(0, 0));
        let mut state = EpisodeState::new(
            Snake::new(Position::new(5, 5), Direction::Up, 3),
            Position::new(8, 2),
            barriers,
            GridSize::new(10, 10),
        );
        state.score = 42;
        state.high_score = 97;
        state
    }

    #[test]
    fn test_running_board() {
        let text = screen_text(&sample_state());

        assert!(text.contains("Score: 42"));
        assert!(text.contains("High Score: 97"));
        assert!(text.contains("Episode: 3"));
        assert!(text.contains("hybrid"));
        assert!(text.contains('#'));
        assert!(text.contains('O'));
    }

    #[test]
    fn test_game_over_panel() {
        let mut state = sample_state();
        state.status = EpisodeStatus::Terminated(Termination::Barrier);

        let text = screen_text(&state);

        assert!(text.contains("GAME OVER"));
        assert!(text.contains("(barrier)"));
        assert!(text.contains("Final Score: 42"));
    }
}
