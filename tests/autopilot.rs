use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use orb_snake::game::{
    manhattan, Direction, EpisodeSimulator, EpisodeState, GameConfig, GridSize, Position, Snake,
    Termination,
};
use orb_snake::policy::{GreedyPolicy, Policy, PolicyKind};

const ALL_POLICIES: [PolicyKind; 3] = [PolicyKind::Astar, PolicyKind::Greedy, PolicyKind::Hybrid];

fn check_invariants(state: &EpisodeState) {
    for cell in &state.snake.body {
        assert!(state.is_in_bounds(*cell), "snake left the grid at {:?}", cell);
        assert!(!state.is_barrier(*cell), "snake overlaps barrier at {:?}", cell);
    }

    assert!(state.is_in_bounds(state.orb));
    assert!(!state.is_barrier(state.orb));

    if state.is_running() {
        assert!(!state.snake.occupies(state.orb), "orb spawned on the snake");
        let head = state.snake.head();
        assert!(
            !state.snake.body[1..].contains(&head),
            "running snake overlaps itself"
        );
    }

    assert!(state.high_score >= 0);
}

#[test]
fn test_invariants_hold_for_every_policy() {
    for kind in ALL_POLICIES {
        let config = GameConfig::default().with_seed(7);
        let reward = config.orb_reward;
        let cost = config.move_cost;
        let mut sim = EpisodeSimulator::new(config).unwrap();
        let policy = kind.build();

        let mut orbs = 0i64;
        for _ in 0..1_500 {
            check_invariants(sim.state());

            let result = sim.advance(policy.as_ref());
            if result.info.collected_orb {
                orbs += 1;
            }

            let state = sim.state();
            assert_eq!(
                state.score,
                orbs * reward - state.ticks as i64 * cost,
                "{} score drifted",
                policy.name()
            );

            if result.terminated {
                check_invariants(sim.state());
                sim.reset();
                orbs = 0;
            }
        }
    }
}

#[test]
fn test_astar_collects_orb_in_manhattan_ticks() {
    let config = GameConfig::new(12, 12).without_barriers().with_seed(3);
    let start = Position::new(2, 9);
    let orb = Position::new(8, 4);
    let state = EpisodeState::new(
        Snake::new(start, Direction::Up, 3),
        orb,
        HashSet::new(),
        GridSize::new(12, 12),
    );

    let mut sim = EpisodeSimulator::with_state(config, state);
    let policy = PolicyKind::Astar.build();
    let distance = manhattan(start, orb);

    for tick in 1..=distance {
        let result = sim.advance(policy.as_ref());
        assert!(!result.terminated);
        assert_eq!(result.info.collected_orb, tick == distance);
    }

    assert_eq!(sim.state().snake.len(), 4);
    assert_eq!(sim.state().score, 100 - distance as i64);
}

#[test]
fn test_greedy_and_hybrid_only_crash_when_trapped() {
    // Open moves with the tail counted as free
    let lookahead = GreedyPolicy::new();

    for kind in [PolicyKind::Greedy, PolicyKind::Hybrid] {
        for seed in 0..5 {
            let mut sim = EpisodeSimulator::new(GameConfig::default().with_seed(seed)).unwrap();
            let policy = kind.build();

            for _ in 0..600 {
                let before = sim.state().snapshot();
                let trapped = lookahead.candidates(&before).is_empty();
                let head = before.head();
                let tail = before.tail();

                let result = sim.advance(policy.as_ref());

                let Some(cause) = result.info.termination else {
                    continue;
                };
                let Some(direction) = result.direction else {
                    panic!("{} episode ended without a move", policy.name());
                };
                let hit = head.moved_in_direction(direction);

                match cause {
                    Termination::Wall | Termination::Barrier => assert!(
                        trapped,
                        "{} hit a {} with a free move left",
                        policy.name(),
                        cause.as_str()
                    ),
                    // Only the tail cell, which the lookahead treats as vacating, is fair game
                    Termination::SelfCollision => assert!(
                        trapped || Some(hit) == tail,
                        "{} ran into its body at {:?} with a free move left",
                        policy.name(),
                        hit
                    ),
                    Termination::BoardFilled => {}
                }
                sim.reset();
            }
        }
    }
}

#[test]
fn test_hybrid_avoids_dead_end_greedy_enters() {
    // UP is one step from the orb but leads into a three-cell pocket;
    // RIGHT and DOWN share nine cells and RIGHT ends further from the tail.
    //
    //   # # # # # #
    //   # . O . # .
    //   # # # H . .
    //   . . . t . .
    let barriers: HashSet<Position> = [
        (0, 0),
        (1, 0),
        (2, 0),
        (3, 0),
        (4, 0),
        (5, 0),
        (0, 1),
        (4, 1),
        (0, 2),
        (1, 2),
        (2, 2),
    ]
    .into_iter()
    .map(Position::from)
    .collect();
    let snake = Snake::from_cells([Position::new(3, 2), Position::new(3, 3)]);

    let state = EpisodeState::new(snake, Position::new(2, 1), barriers, GridSize::new(6, 4));
    let snapshot = state.snapshot();
    let mut rng = StdRng::seed_from_u64(5);

    let greedy = PolicyKind::Greedy.build().select_move(&snapshot, &mut rng);
    let hybrid = PolicyKind::Hybrid.build().select_move(&snapshot, &mut rng);

    assert_eq!(greedy, Direction::Up);
    assert_eq!(hybrid, Direction::Right);
}

#[test]
fn test_reset_keeps_high_score_only() {
    let config = GameConfig::small().with_seed(11);
    let initial = config.initial_snake();
    let mut sim = EpisodeSimulator::new(config).unwrap();
    let policy = PolicyKind::Astar.build();

    for _ in 0..100_000 {
        if sim.advance(policy.as_ref()).terminated {
            break;
        }
    }
    assert!(!sim.state().is_running());
    let high_score = sim.state().high_score;
    assert_eq!(high_score, sim.state().score.max(0));

    let state = sim.reset();
    assert!(state.is_running());
    assert_eq!(state.score, 0);
    assert_eq!(state.ticks, 0);
    assert_eq!(state.high_score, high_score);
    assert_eq!(state.snake, initial);
}

#[test]
fn test_same_seed_same_episode() {
    for kind in ALL_POLICIES {
        let run = |seed| {
            let mut sim = EpisodeSimulator::new(GameConfig::default().with_seed(seed)).unwrap();
            let policy = kind.build();
            let moves: Vec<Option<Direction>> =
                (0..200).map(|_| sim.advance(policy.as_ref()).direction).collect();
            (moves, sim.state().score)
        };

        assert_eq!(run(99), run(99));
    }
}
