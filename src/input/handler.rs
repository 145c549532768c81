use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::modes::watch::PlaybackSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    Speed(PlaybackSpeed),
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') => KeyAction::TogglePause,

            KeyCode::Char('1') => KeyAction::Speed(PlaybackSpeed::Slow),
            KeyCode::Char('2') => KeyAction::Speed(PlaybackSpeed::Normal),
            KeyCode::Char('3') => KeyAction::Speed(PlaybackSpeed::Fast),
            KeyCode::Char('4') => KeyAction::Speed(PlaybackSpeed::VeryFast),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
