use anyhow::Result;
use clap::{Parser, ValueEnum};
use orb_snake::game::{ConfigOverrides, GameConfig};
use orb_snake::modes::{HeadlessConfig, HeadlessMode, WatchMode};
use orb_snake::policy::PolicyKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orb_snake")]
#[command(version, about = "Snake autopilot with A*, greedy and hybrid policies")]
struct Cli {
    /// Move policy driving the snake
    #[arg(long, value_enum, default_value = "hybrid")]
    policy: PolicyKind,

    /// Watch in the terminal or run headless
    #[arg(long, value_enum, default_value = "watch")]
    mode: Mode,

    /// Load game configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// RNG seed for barriers, orbs and random fallbacks
    #[arg(long)]
    seed: Option<u64>,

    /// Tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Episodes to play in headless mode
    #[arg(long, default_value = "10")]
    episodes: u32,

    /// Tick limit per episode in headless mode
    #[arg(long, default_value = "10000")]
    max_ticks: u64,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Watch the autopilot play in the terminal
    Watch,
    /// Play episodes without a UI and print the results
    Headless,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let overrides = ConfigOverrides {
            grid_width: self.width,
            grid_height: self.height,
            seed: self.seed,
            tick_interval_ms: self.tick_ms,
        };
        GameConfig::resolve(self.config.as_deref(), &overrides)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.game_config()?;
    let policy = cli.policy.build();

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Watch => {
            // The TUI owns the terminal, so no log output here
            let mut watch_mode = WatchMode::new(config, policy)?;
            watch_mode.run().await?;
        }
        Mode::Headless => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
                )
                .with_writer(std::io::stderr)
                .init();

            let mut headless_config = HeadlessConfig::new(cli.episodes, config);
            headless_config.max_ticks = cli.max_ticks;

            let mut headless_mode = HeadlessMode::new(headless_config, policy)?;
            headless_mode.run()?;
        }
    }

    Ok(())
}
