pub mod headless;
pub mod watch;

pub use headless::{HeadlessConfig, HeadlessMode};
pub use watch::{PlaybackSpeed, WatchMode};
