use std::time::Instant;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::{
    action::Direction,
    config::GameConfig,
    spawn::{generate_barriers, spawn_orb},
    state::{EpisodeState, EpisodeStatus, Position, Termination},
};
use crate::policy::Policy;

/// Information about a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickInfo {
    /// Whether the head landed on the orb this tick
    pub collected_orb: bool,
    /// Why the episode ended, if it did
    pub termination: Option<Termination>,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Move the policy chose; `None` when the episode had already ended
    pub direction: Option<Direction>,
    /// Score after the tick
    pub score: i64,
    /// Whether the episode has terminated
    pub terminated: bool,
    /// Additional information about the tick
    pub info: TickInfo,
}

/// Owns the episode state and advances it one policy decision at a time
pub struct EpisodeSimulator {
    config: GameConfig,
    rng: StdRng,
    state: EpisodeState,
    clock: Instant,
}

impl EpisodeSimulator {
    /// Create a simulator and start its first episode.
    ///
    /// Fails when `config` does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = fresh_episode(&config, &mut rng);

        Ok(Self {
            config,
            rng,
            state,
            clock: Instant::now(),
        })
    }

    /// Create a simulator around an explicit state (mostly for tests)
    pub fn with_state(config: GameConfig, state: EpisodeState) -> Self {
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_default());
        Self {
            config,
            rng,
            state,
            clock: Instant::now(),
        }
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a new episode, keeping the high score
    pub fn reset(&mut self) -> &EpisodeState {
        let high_score = self.state.high_score;
        self.state = fresh_episode(&self.config, &mut self.rng);
        self.state.high_score = high_score;
        self.clock = Instant::now();
        &self.state
    }

    /// Ask `policy` for a move and apply it
    pub fn advance(&mut self, policy: &dyn Policy) -> TickResult {
        if let EpisodeStatus::Terminated(cause) = self.state.status {
            return TickResult {
                direction: None,
                score: self.state.score,
                terminated: true,
                info: TickInfo {
                    collected_orb: false,
                    termination: Some(cause),
                },
            };
        }

        let direction = policy.select_move(&self.state.snapshot(), &mut self.rng);
        let new_head = self.state.snake.head().moved_in_direction(direction);

        self.state.score -= self.config.move_cost;
        self.state.ticks += 1;
        self.state.elapsed = self.clock.elapsed();

        debug!(
            policy = policy.name(),
            tick = self.state.ticks,
            direction = direction.as_str(),
            x = new_head.x,
            y = new_head.y,
            "policy move"
        );

        if let Some(cause) = self.check_collision(new_head) {
            self.terminate(cause);
            return self.result(direction, false);
        }

        self.state.snake.shift_to(new_head);

        let collected_orb = new_head == self.state.orb;
        if collected_orb {
            self.state.snake.grow();
            self.state.score += self.config.orb_reward;

            match spawn_orb(
                &mut self.rng,
                self.state.grid,
                &self.state.snake,
                &self.state.barriers,
            ) {
                Some(orb) => self.state.orb = orb,
                None => {
                    warn!(length = self.state.snake.len(), "no free cell left for an orb");
                    self.terminate(Termination::BoardFilled);
                }
            }
        }

        self.result(direction, collected_orb)
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<Termination> {
        if !self.state.is_in_bounds(pos) {
            return Some(Termination::Wall);
        }

        if self.state.is_barrier(pos) {
            return Some(Termination::Barrier);
        }

        // The tail still occupies its cell while the move is being checked
        if self.state.snake.occupies(pos) {
            return Some(Termination::SelfCollision);
        }

        None
    }

    fn terminate(&mut self, cause: Termination) {
        self.state.status = EpisodeStatus::Terminated(cause);
        self.state.high_score = self.state.high_score.max(self.state.score);

        info!(
            cause = cause.as_str(),
            score = self.state.score,
            high_score = self.state.high_score,
            length = self.state.snake.len(),
            ticks = self.state.ticks,
            elapsed_secs = self.state.elapsed.as_secs_f64(),
            "episode over"
        );
    }

    fn result(&self, direction: Direction, collected_orb: bool) -> TickResult {
        let termination = self.state.termination();
        TickResult {
            direction: Some(direction),
            score: self.state.score,
            terminated: termination.is_some(),
            info: TickInfo {
                collected_orb,
                termination,
            },
        }
    }
}

/// Build the starting state of an episode: fixed snake, random barriers, random orb
fn fresh_episode(config: &GameConfig, rng: &mut StdRng) -> EpisodeState {
    let grid = config.grid();
    let snake = config.initial_snake();
    let barriers = generate_barriers(
        rng,
        grid,
        &snake,
        config.barrier_coverage,
        config.max_barrier_cluster,
    );
    let orb = spawn_orb(rng, grid, &snake, &barriers).unwrap_or_else(|| {
        warn!("starting board has no free cell for an orb");
        snake.tail()
    });

    EpisodeState::new(snake, orb, barriers, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridSize, Snake, Snapshot};
    use rand::RngCore;
    use std::collections::HashSet;

    /// Always answers with the same direction
    struct Fixed(Direction);

    impl Policy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn select_move(&self, _snapshot: &Snapshot<'_>, _rng: &mut dyn RngCore) -> Direction {
            self.0
        }
    }

    fn open_state(snake: Snake, orb: Position) -> EpisodeState {
        EpisodeState::new(snake, orb, HashSet::new(), GridSize::new(10, 10))
    }

    fn simulator(state: EpisodeState) -> EpisodeSimulator {
        EpisodeSimulator::with_state(GameConfig::small().with_seed(9), state)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        // A 1x3 column fully covered by the snake leaves nowhere for the orb
        let mut config = GameConfig::new(1, 3).without_barriers();
        config.initial_head = Position::new(0, 0);
        config.initial_direction = Direction::Up;

        assert!(EpisodeSimulator::new(config.clone()).is_err());

        config.grid_height = 4;
        let sim = EpisodeSimulator::new(config).unwrap();
        assert!(!sim.state().snake.occupies(sim.state().orb));
        assert_eq!(sim.state().orb, Position::new(0, 3));
    }

    #[test]
    fn test_reset() {
        let mut sim = EpisodeSimulator::new(GameConfig::default().with_seed(1)).unwrap();
        let state = sim.reset();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_basic_movement() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let mut sim = simulator(open_state(snake, Position::new(0, 0)));

        let result = sim.advance(&Fixed(Direction::Left));

        assert!(!result.terminated);
        assert!(!result.info.collected_orb);
        assert_eq!(result.score, -1);
        assert_eq!(sim.state().ticks, 1);
        assert_eq!(
            sim.state().snake.body,
            vec![Position::new(4, 5), Position::new(5, 5), Position::new(5, 6)]
        );
    }

    #[test]
    fn test_orb_collection() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let mut sim = simulator(open_state(snake, Position::new(5, 4)));

        let result = sim.advance(&Fixed(Direction::Up));
        let state = sim.state();

        assert!(result.info.collected_orb);
        assert_eq!(state.score, 99);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.head(), Position::new(5, 4));
        assert_eq!(state.snake.body[2], state.snake.body[3]);
        assert!(!state.snake.occupies(state.orb));
        assert!(state.is_in_bounds(state.orb));
    }

    #[test]
    fn test_wall_collision() {
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        let mut sim = simulator(open_state(snake.clone(), Position::new(5, 5)));

        let result = sim.advance(&Fixed(Direction::Left));

        assert!(result.terminated);
        assert_eq!(result.info.termination, Some(Termination::Wall));
        assert_eq!(sim.state().snake, snake);
    }

    #[test]
    fn test_barrier_collision() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let mut state = open_state(snake, Position::new(0, 0));
        state.barriers.insert(Position::new(6, 5));
        let mut sim = simulator(state);

        let result = sim.advance(&Fixed(Direction::Right));

        assert!(result.terminated);
        assert_eq!(result.info.termination, Some(Termination::Barrier));
    }

    #[test]
    fn test_self_collision_keeps_body() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let mut state = open_state(snake.clone(), Position::new(0, 0));
        state.score = 40;
        state.high_score = 12;
        let mut sim = simulator(state);

        // (5, 6) is the second segment
        let result = sim.advance(&Fixed(Direction::Down));

        assert!(result.terminated);
        assert_eq!(result.info.termination, Some(Termination::SelfCollision));
        assert_eq!(sim.state().score, 39);
        assert_eq!(sim.state().high_score, 39);
        assert_eq!(sim.state().snake, snake);
    }

    #[test]
    fn test_tail_cell_still_blocks() {
        // Head at (1, 0), body wraps so the tail sits right of the head
        let snake = Snake::from_cells([
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(2, 0),
        ]);
        let mut sim = simulator(open_state(snake, Position::new(9, 9)));

        let result = sim.advance(&Fixed(Direction::Right));

        assert_eq!(result.info.termination, Some(Termination::SelfCollision));
    }

    #[test]
    fn test_high_score_not_lowered() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let mut state = open_state(snake, Position::new(0, 0));
        state.high_score = 250;
        let mut sim = simulator(state);

        sim.advance(&Fixed(Direction::Down));

        assert_eq!(sim.state().high_score, 250);
    }

    #[test]
    fn test_terminated_episode_no_update() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        let mut sim = simulator(open_state(snake, Position::new(0, 0)));
        sim.advance(&Fixed(Direction::Down));
        let frozen = sim.state().clone();

        let result = sim.advance(&Fixed(Direction::Left));

        assert!(result.terminated);
        assert_eq!(result.direction, None);
        assert_eq!(sim.state(), &frozen);
    }

    #[test]
    fn test_reset_preserves_high_score() {
        let mut sim = EpisodeSimulator::new(GameConfig::default().with_seed(3)).unwrap();
        sim.state.score = 120;
        sim.terminate(Termination::Barrier);
        assert_eq!(sim.state().high_score, 120);

        let state = sim.reset();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 120);
        assert_eq!(state.snake, GameConfig::default().initial_snake());
    }

    #[test]
    fn test_seeded_episodes_repeat() {
        let a = EpisodeSimulator::new(GameConfig::default().with_seed(42)).unwrap();
        let b = EpisodeSimulator::new(GameConfig::default().with_seed(42)).unwrap();

        assert_eq!(a.state().barriers, b.state().barriers);
        assert_eq!(a.state().orb, b.state().orb);
    }

    #[test]
    fn test_fresh_episode_invariants() {
        let mut sim = EpisodeSimulator::new(GameConfig::default().with_seed(11)).unwrap();

        for _ in 0..20 {
            let state = sim.reset();
            assert!(!state.snake.occupies(state.orb));
            assert!(!state.barriers.contains(&state.orb));
            assert!(state.snake.body.iter().all(|b| !state.barriers.contains(b)));
            assert!(state.barriers.len() <= 100);
        }
    }
}
