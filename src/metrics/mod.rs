pub mod session;

pub use session::{format_game_over, format_time, SessionMetrics};
